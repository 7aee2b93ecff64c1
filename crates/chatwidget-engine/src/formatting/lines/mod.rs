//! # Reply Lines to Markup
//!
//! First stage of the formatting pipeline: turns loosely structured assistant
//! text into restricted block markup.
//!
//! ## Phases
//!
//! 1. **Marker emphasis**: `**1. Title**` and `**- note**` lose the `**` in
//!    front of the list marker, so the line is still classified as a list line
//! 2. **Line Classification** (`classify`): each line becomes a [`LineClass`]
//! 3. **Markup Construction** (`builder`): a [`MarkupBuilder`] groups bullets
//!    under the preceding numbered item and coalesces list items into `<ol>`
//!
//! Content placed into the markup goes through [`inline_markup`]: `**text**`
//! pairs become `<strong>text</strong>`, and content that is not a well-formed
//! fragment on its own is escaped so the markup as a whole stays well-formed.
//!
//! Lines that already start with a block tag pass through untouched, as does
//! every line while a block tag opened on an earlier line is still open. So
//! multi-line markup from the assistant survives, and feeding the output back
//! in yields the same markup.

pub mod builder;
pub mod classify;

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::formatting::markup::tree::build_tree;

pub use builder::MarkupBuilder;
pub use classify::{LineClass, ReplyLineClassifier};

/// Builds reply markup from raw assistant text. Never fails.
pub fn build_markup(raw: &str) -> String {
    let classifier = ReplyLineClassifier;
    let mut builder = MarkupBuilder::new();

    for line in raw.split('\n') {
        if builder.in_open_block() {
            builder.push(&classifier.markup(line));
            continue;
        }
        let line = unwrap_marker_emphasis(line);
        let lc = classifier.classify(&line);
        builder.push(&lc);
    }

    builder.finish()
}

/// Moves a `**` that opens before a list marker to just after it.
///
/// `**1. Title**` becomes `1. **Title**` and `**1.** Title` becomes `1. Title`.
fn unwrap_marker_emphasis(line: &str) -> Cow<'_, str> {
    static CLOSED_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    static OPEN_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    let closed = CLOSED_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"^(\s*)\*\*(\d+\.|[-•])\*\*\s+").expect("Invalid closed marker regex")
    });
    let open = OPEN_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"^(\s*)\*\*(\d+\.|[-•])\s+").expect("Invalid open marker regex")
    });

    if closed.is_match(line) {
        return closed.replace(line, "$1$2 ");
    }
    open.replace(line, "$1$2 **")
}

/// Turns `**text**` pairs into `<strong>` tags.
pub fn strong_pairs(text: &str) -> Cow<'_, str> {
    bold_regex().replace_all(text, "<strong>$1</strong>")
}

/// Markup for line content: bold pairs converted, and escaped when the
/// content would not parse as a well-formed fragment by itself.
pub fn inline_markup(content: &str) -> String {
    let converted = strong_pairs(content);
    if build_tree(&converted).is_ok() {
        return converted.into_owned();
    }
    let escaped = html_escape::encode_text(content);
    strong_pairs(&escaped).into_owned()
}

fn bold_regex() -> &'static Regex {
    static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
    BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"))
}
