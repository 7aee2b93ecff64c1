//! Converts a markup tree into reply [`Node`]s.
//!
//! Dispatch, in precedence order, for every element met at block level:
//!
//! - `ol` not directly inside an `li` → [`Node::OrderedList`]
//! - `ul` → [`Node::UnorderedList`] (inside an ordered item it becomes the
//!   item's nested list instead, see [`list_item`])
//! - `p` → [`Node::Paragraph`], `h1`–`h4` → [`Node::Heading`]
//! - `strong`/`b`/`em`/`i` and loose text → inline content of an implicit paragraph
//! - anything else is transparent: its children are spliced into its place

use crate::formatting::types::{InlineNode, ListItem, Node, UnorderedList};

use super::tree::{DomNode, Tag};

/// Structural parent of the nodes being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    ListItem,
    Other,
}

pub fn convert(dom: &[DomNode]) -> Vec<Node> {
    let mut out = vec![];
    let mut pending = vec![];
    blocks_into(dom, Parent::Other, &mut out, &mut pending);
    flush_paragraph(&mut out, &mut pending);
    out
}

fn blocks_into(
    nodes: &[DomNode],
    parent: Parent,
    out: &mut Vec<Node>,
    pending: &mut Vec<InlineNode>,
) {
    for node in nodes {
        let (tag, children) = match node {
            DomNode::Text(text) => {
                if !text.trim().is_empty() || !pending.is_empty() {
                    push_text(pending, text);
                }
                continue;
            }
            DomNode::Element { tag, children } => (tag, children),
        };

        match tag {
            Tag::OrderedList if parent != Parent::ListItem => {
                flush_paragraph(out, pending);
                out.push(Node::OrderedList {
                    items: list_items(children, list_item),
                });
            }
            Tag::UnorderedList => {
                flush_paragraph(out, pending);
                out.push(Node::UnorderedList(unordered_list(children)));
            }
            Tag::Paragraph => {
                flush_paragraph(out, pending);
                out.push(Node::Paragraph {
                    inline: inline_nodes(children),
                });
            }
            Tag::Heading(level) => {
                flush_paragraph(out, pending);
                out.push(Node::Heading {
                    level: *level,
                    inline: inline_nodes(children),
                });
            }
            Tag::Bold | Tag::Italic => inline_into(std::slice::from_ref(node), pending),
            Tag::Void => {}
            Tag::OrderedList | Tag::ListItem | Tag::Other(_) => {
                if node.contains_block() {
                    let parent = if *tag == Tag::ListItem {
                        Parent::ListItem
                    } else {
                        Parent::Other
                    };
                    flush_paragraph(out, pending);
                    blocks_into(children, parent, out, pending);
                    flush_paragraph(out, pending);
                } else {
                    inline_into(children, pending);
                }
            }
        }
    }
}

fn flush_paragraph(out: &mut Vec<Node>, pending: &mut Vec<InlineNode>) {
    if let Some(InlineNode::Text(first)) = pending.first_mut() {
        let leading = first.len() - first.trim_start().len();
        first.drain(..leading);
        if first.is_empty() {
            pending.remove(0);
        }
    }
    if let Some(InlineNode::Text(last)) = pending.last_mut() {
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        if last.is_empty() {
            pending.pop();
        }
    }
    if !pending.is_empty() {
        out.push(Node::Paragraph {
            inline: std::mem::take(pending),
        });
    }
}

/// Collects the `li` children of a list; other children are ignored.
fn list_items(children: &[DomNode], item: fn(&[DomNode]) -> ListItem) -> Vec<ListItem> {
    children
        .iter()
        .filter_map(|child| match child {
            DomNode::Element {
                tag: Tag::ListItem,
                children,
            } => Some(item(children)),
            _ => None,
        })
        .collect()
}

/// Content of an ordered list item: inline content plus any nested bulleted lists.
///
/// Several `ul` children are kept as separate nested lists, in order.
fn list_item(children: &[DomNode]) -> ListItem {
    let mut item = ListItem::default();
    for child in children {
        match child {
            DomNode::Element {
                tag: Tag::UnorderedList,
                children,
            } => item.nested_lists.push(unordered_list(children)),
            other => inline_into(std::slice::from_ref(other), &mut item.inline),
        }
    }
    item
}

/// A bulleted list whose items are flat: anything inside them is inline.
fn unordered_list(children: &[DomNode]) -> UnorderedList {
    UnorderedList {
        items: list_items(children, flat_item),
    }
}

fn flat_item(children: &[DomNode]) -> ListItem {
    ListItem {
        inline: inline_nodes(children),
        nested_lists: vec![],
    }
}

fn inline_nodes(nodes: &[DomNode]) -> Vec<InlineNode> {
    let mut out = vec![];
    inline_into(nodes, &mut out);
    out
}

/// Inline rule: text, bold and italic are kept, every other element is unwrapped.
fn inline_into(nodes: &[DomNode], out: &mut Vec<InlineNode>) {
    for node in nodes {
        match node {
            DomNode::Text(text) => push_text(out, text),
            DomNode::Element {
                tag: Tag::Bold,
                children,
            } => out.push(InlineNode::Bold(inline_nodes(children))),
            DomNode::Element {
                tag: Tag::Italic,
                children,
            } => out.push(InlineNode::Italic(inline_nodes(children))),
            DomNode::Element { children, .. } => inline_into(children, out),
        }
    }
}

/// Appends text, merging with a preceding text node.
fn push_text(out: &mut Vec<InlineNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineNode::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(InlineNode::Text(text.to_string()));
    }
}
