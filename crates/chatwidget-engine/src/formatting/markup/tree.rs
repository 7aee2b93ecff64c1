use crate::formatting::types::HeadingLevel;

use super::lexer::{Token, TokenKind, lex};

/// Closed set of element kinds the converter dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    OrderedList,
    UnorderedList,
    ListItem,
    Paragraph,
    Heading(HeadingLevel),
    /// `strong` or `b`
    Bold,
    /// `em` or `i`
    Italic,
    /// Elements that never have content or a closing tag (`br`, `hr`, `img`, `wbr`).
    Void,
    /// Anything else, by lowercased name.
    Other(String),
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ol" => Tag::OrderedList,
            "ul" => Tag::UnorderedList,
            "li" => Tag::ListItem,
            "p" => Tag::Paragraph,
            "h1" => Tag::Heading(HeadingLevel::H1),
            "h2" => Tag::Heading(HeadingLevel::H2),
            "h3" => Tag::Heading(HeadingLevel::H3),
            "h4" => Tag::Heading(HeadingLevel::H4),
            "strong" | "b" => Tag::Bold,
            "em" | "i" => Tag::Italic,
            "br" | "hr" | "img" | "wbr" => Tag::Void,
            other => Tag::Other(other.to_string()),
        }
    }

    /// Whether this tag introduces block structure.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Tag::OrderedList | Tag::UnorderedList | Tag::ListItem | Tag::Paragraph | Tag::Heading(_)
        )
    }
}

/// A node of the parsed markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Text(String),
    Element { tag: Tag, children: Vec<DomNode> },
}

impl DomNode {
    /// Whether this node or any descendant is a block element.
    pub fn contains_block(&self) -> bool {
        match self {
            DomNode::Text(_) => false,
            DomNode::Element { tag, children } => {
                tag.is_block() || children.iter().any(DomNode::contains_block)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("truncated tag {text:?} at byte {position}")]
    TruncatedTag { text: String, position: usize },
    #[error("unexpected closing tag </{name}> at byte {position}")]
    UnexpectedClose { name: String, position: usize },
    #[error("unclosed <{name}> at end of markup")]
    Unclosed { name: String },
}

/// An open element waiting for its closing tag.
struct Frame {
    name: String,
    tag: Tag,
    children: Vec<DomNode>,
}

/// Parses markup into a tree, checking that every opened tag is closed in order.
pub fn build_tree(markup: &str) -> Result<Vec<DomNode>, MarkupError> {
    let mut root: Vec<DomNode> = vec![];
    let mut stack: Vec<Frame> = vec![];

    for token in lex(markup) {
        let siblings = match stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut root,
        };

        match token.kind {
            TokenKind::Text => push_text(siblings, &html_escape::decode_html_entities(token.text)),
            TokenKind::Lt => push_text(siblings, token.text),
            TokenKind::TruncatedTag => {
                return Err(MarkupError::TruncatedTag {
                    text: token.text.to_string(),
                    position: token.span.start,
                });
            }
            TokenKind::OpenTag => {
                let name = tag_name(&token);
                let tag = Tag::from_name(&name);
                if tag == Tag::Void || token.is_self_closing() {
                    siblings.push(DomNode::Element {
                        tag,
                        children: vec![],
                    });
                } else {
                    stack.push(Frame {
                        name,
                        tag,
                        children: vec![],
                    });
                }
            }
            TokenKind::CloseTag => {
                let name = tag_name(&token);
                if Tag::from_name(&name) == Tag::Void {
                    continue;
                }
                match stack.pop() {
                    Some(frame) if frame.name == name => {
                        let parent = match stack.last_mut() {
                            Some(parent) => &mut parent.children,
                            None => &mut root,
                        };
                        parent.push(DomNode::Element {
                            tag: frame.tag,
                            children: frame.children,
                        });
                    }
                    _ => {
                        return Err(MarkupError::UnexpectedClose {
                            name,
                            position: token.span.start,
                        });
                    }
                }
            }
        }
    }

    match stack.pop() {
        Some(frame) => Err(MarkupError::Unclosed { name: frame.name }),
        None => Ok(root),
    }
}

fn tag_name(token: &Token<'_>) -> String {
    token.tag_name().unwrap_or_default()
}

/// Appends text, merging with a preceding text node.
fn push_text(siblings: &mut Vec<DomNode>, text: &str) {
    if let Some(DomNode::Text(prev)) = siblings.last_mut() {
        prev.push_str(text);
    } else {
        siblings.push(DomNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> DomNode {
        DomNode::Text(s.to_string())
    }

    fn el(tag: Tag, children: Vec<DomNode>) -> DomNode {
        DomNode::Element { tag, children }
    }

    #[test]
    fn builds_nested_tree() {
        let tree = build_tree("<ol><li>X<ul><li>Y</li></ul></li></ol>").unwrap();
        assert_eq!(
            tree,
            vec![el(
                Tag::OrderedList,
                vec![el(
                    Tag::ListItem,
                    vec![
                        text("X"),
                        el(Tag::UnorderedList, vec![el(Tag::ListItem, vec![text("Y")])]),
                    ]
                )]
            )]
        );
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        let tree = build_tree("<P>a</p><B>b</b>").unwrap();
        assert_eq!(
            tree,
            vec![
                el(Tag::Paragraph, vec![text("a")]),
                el(Tag::Bold, vec![text("b")]),
            ]
        );
    }

    #[test]
    fn decodes_entities_and_keeps_lone_less_than() {
        let tree = build_tree("<p>fish &amp; chips < 5&euro;</p>").unwrap();
        assert_eq!(tree, vec![el(Tag::Paragraph, vec![text("fish & chips < 5€")])]);
    }

    #[test]
    fn void_and_self_closing_elements_need_no_close() {
        let tree = build_tree("<p>a<br>b<span/>c</br></p>").unwrap();
        assert_eq!(
            tree,
            vec![el(
                Tag::Paragraph,
                vec![
                    text("a"),
                    el(Tag::Void, vec![]),
                    text("b"),
                    el(Tag::Other("span".into()), vec![]),
                    text("c"),
                ]
            )]
        );
    }

    #[test]
    fn truncated_tag_is_an_error() {
        assert_eq!(
            build_tree("<ol><li>X</li"),
            Err(MarkupError::TruncatedTag {
                text: "</li".into(),
                position: 9,
            })
        );
    }

    #[test]
    fn mismatched_close_is_an_error() {
        assert_eq!(
            build_tree("<p><b>x</p></b>"),
            Err(MarkupError::UnexpectedClose {
                name: "p".into(),
                position: 7,
            })
        );
        assert!(matches!(
            build_tree("stray</p>"),
            Err(MarkupError::UnexpectedClose { .. })
        ));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        assert_eq!(
            build_tree("<ol><li>X</li>"),
            Err(MarkupError::Unclosed { name: "ol".into() })
        );
    }

    #[test]
    fn contains_block_looks_through_wrappers() {
        let tree = build_tree("<div><span><p>x</p></span></div><span>y</span>").unwrap();
        assert!(tree[0].contains_block());
        assert!(!tree[1].contains_block());
    }
}
