//! # Markup to Nodes
//!
//! Second stage of the formatting pipeline.
//!
//! ## Modules
//!
//! - **`lexer`**: Logos tokenizer for tags and text
//! - **`tree`**: `build_tree` checks well-formedness and builds a `DomNode` tree
//! - **`convert`**: dispatch rules from tags to [`Node`]s
//!
//! ## Failure Semantics
//!
//! Unknown tags are unwrapped or dropped and never reported. Only markup that
//! is not a well-formed fragment (truncated, mismatched or unclosed tags)
//! fails, and then [`parse_markup`] hands back the input verbatim.
//!
//! [`Node`]: crate::formatting::types::Node

pub mod convert;
pub mod lexer;
pub mod tree;

use std::sync::OnceLock;

use regex::Regex;

use crate::formatting::types::Rendered;

pub use tree::{DomNode, MarkupError, Tag};

/// Parses reply markup into nodes, or returns it unchanged if it is malformed.
pub fn parse_markup(markup: &str) -> Rendered {
    match try_parse_markup(markup) {
        Ok(rendered) => rendered,
        Err(e) => {
            log::warn!("Rendering reply as plain text: {e}");
            Rendered::Raw(markup.to_string())
        }
    }
}

/// Like [`parse_markup`] but reports why the markup was rejected.
pub fn try_parse_markup(markup: &str) -> Result<Rendered, MarkupError> {
    let cleaned = clean_whitespace(markup);
    if cleaned.is_empty() {
        return Ok(Rendered::Nodes(vec![]));
    }

    let dom = tree::build_tree(&cleaned)?;
    Ok(Rendered::Nodes(convert::convert(&dom)))
}

/// Collapses whitespace runs to one space and drops whitespace between tags.
pub fn clean_whitespace(markup: &str) -> String {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    static BETWEEN_TAGS_REGEX: OnceLock<Regex> = OnceLock::new();
    let whitespace =
        WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));
    let between_tags =
        BETWEEN_TAGS_REGEX.get_or_init(|| Regex::new(r">\s+<").expect("Invalid between-tags regex"));

    let collapsed = whitespace.replace_all(markup, " ");
    between_tags.replace_all(&collapsed, "><").trim().to_string()
}
