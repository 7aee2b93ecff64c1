use serde::Serialize;

/// Heading depth supported by the reply markup (`h1` to `h4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Maps a numeric level to a [`HeadingLevel`], `None` outside `1..=4`.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }
}

/// Inline content of a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum InlineNode {
    /// Plain text with character references already decoded.
    Text(String),
    Bold(Vec<InlineNode>),
    Italic(Vec<InlineNode>),
}

/// A block-level node of a rendered reply.
///
/// The renderer owns every presentation decision; nothing here carries style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Node {
    /// Top-level numbered list. Visual numbering is sequential and left to the renderer.
    OrderedList { items: Vec<ListItem> },
    /// Bulleted list that is not nested inside a list item.
    UnorderedList(UnorderedList),
    Paragraph { inline: Vec<InlineNode> },
    Heading {
        level: HeadingLevel,
        inline: Vec<InlineNode>,
    },
}

/// A bulleted list, either standalone or nested under an ordered list item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnorderedList {
    pub items: Vec<ListItem>,
}

/// A single list entry.
///
/// # Invariants
///
/// - `nested_lists` is only populated for items of an [`Node::OrderedList`]
/// - nested lists are always unordered; nested ordered lists are not supported
/// - an item without bullets has no nested list at all, never an empty one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub inline: Vec<InlineNode>,
    /// Bulleted sub-lists in document order. The line builder emits at most
    /// one; hand-written markup may carry several and each is kept as found.
    pub nested_lists: Vec<UnorderedList>,
}

impl ListItem {
    /// Returns the first nested bulleted list, if any.
    pub fn nested_list(&self) -> Option<&UnorderedList> {
        self.nested_lists.first()
    }

    /// Returns the item's inline content flattened to plain text.
    pub fn text(&self) -> String {
        plain_text(&self.inline)
    }
}

/// Result of parsing reply markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Rendered {
    /// Structured nodes, to be rendered structurally.
    Nodes(Vec<Node>),
    /// The input could not be parsed; render it as-is.
    Raw(String),
}

impl Rendered {
    /// Returns the parsed nodes, or `None` for the raw fallback.
    pub fn nodes(&self) -> Option<&[Node]> {
        match self {
            Rendered::Nodes(nodes) => Some(nodes),
            Rendered::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Rendered::Raw(_))
    }
}

/// Flattens inline nodes to their text content, dropping bold/italic wrappers.
pub fn plain_text(inline: &[InlineNode]) -> String {
    fn walk(nodes: &[InlineNode], out: &mut String) {
        for n in nodes {
            match n {
                InlineNode::Text(t) => out.push_str(t),
                InlineNode::Bold(children) | InlineNode::Italic(children) => walk(children, out),
            }
        }
    }

    let mut out = String::new();
    walk(inline, &mut out);
    out
}
