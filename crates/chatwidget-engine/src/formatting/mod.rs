//! # Reply Formatting
//!
//! Turns an assistant reply into a tree of typed nodes ready for rendering.
//!
//! ## Pipeline
//!
//! ```text
//! raw text ──build_markup──▶ markup ──parse_markup──▶ Rendered
//! ```
//!
//! 1. **`lines`**: numbered items with trailing bullets become nested lists,
//!    loose bullets become flat items, other lines become paragraphs
//! 2. **`markup`**: the markup is parsed and mapped onto [`Node`]s
//!
//! Both stages are pure functions over their input; each call builds a fresh
//! tree and nothing is shared between calls.
//!
//! ## Modules
//!
//! - **`types`**: `Node`, `InlineNode`, `ListItem`, `UnorderedList`, `Rendered`
//! - **`lines`**: line classifier and markup builder
//! - **`markup`**: markup lexer, tree builder and node conversion

pub mod lines;
pub mod markup;
pub mod types;

#[cfg(test)]
mod tests;

pub use lines::build_markup;
pub use markup::parse_markup;
pub use types::{HeadingLevel, InlineNode, ListItem, Node, Rendered, UnorderedList, plain_text};

/// Formats a raw assistant reply.
///
/// When the generated markup cannot be parsed, the raw reply text (not the
/// intermediate markup) is returned for plain rendering.
pub fn format_reply(raw: &str) -> Rendered {
    let markup = build_markup(raw);
    log::debug!("Built reply markup ({} bytes)", markup.len());

    match parse_markup(&markup) {
        Rendered::Raw(_) => Rendered::Raw(raw.to_string()),
        nodes => nodes,
    }
}
