//! Maps chat messages onto styled terminal lines.

use chatwidget_engine::formatting::{InlineNode, ListItem, Node, Rendered};
use chatwidget_engine::{ChatMessage, Sender};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const BULLET: &str = "• ";
const NESTED_INDENT: &str = "   ";

/// Lines for a whole transcript, one blank line between messages.
pub fn transcript_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(message_lines(message));
    }
    lines
}

pub fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    match message.sender {
        Sender::User => {
            let you = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            message
                .text
                .lines()
                .enumerate()
                .map(|(i, text)| {
                    let prefix = if i == 0 { "You: " } else { "     " };
                    Line::from(vec![Span::styled(prefix, you), Span::raw(text.to_string())])
                })
                .collect()
        }
        Sender::Bot => rendered_lines(&message.formatted()),
    }
}

pub fn rendered_lines(rendered: &Rendered) -> Vec<Line<'static>> {
    match rendered {
        Rendered::Nodes(nodes) => node_lines(nodes),
        Rendered::Raw(text) => text.lines().map(|l| Line::from(l.to_string())).collect(),
    }
}

pub fn node_lines(nodes: &[Node]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for node in nodes {
        match node {
            Node::OrderedList { items } => {
                for (n, item) in items.iter().enumerate() {
                    list_item_lines(item, &format!("{}. ", n + 1), &mut lines);
                }
            }
            Node::UnorderedList(list) => {
                for item in &list.items {
                    list_item_lines(item, BULLET, &mut lines);
                }
            }
            Node::Paragraph { inline } => lines.push(inline_line("", inline, Style::default())),
            Node::Heading { inline, .. } => {
                let style = Style::default().add_modifier(Modifier::BOLD);
                lines.push(inline_line("", inline, style));
            }
        }
    }
    lines
}

/// Top row to show so the last wrapped row sits at the bottom of a panel
/// `height` rows tall, moved up by `scroll_back` rows.
///
/// `rows` is the wrapped row count of the whole panel, borders included.
pub fn scroll_offset(rows: usize, height: u16, scroll_back: u16) -> u16 {
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    rows.saturating_sub(height).saturating_sub(scroll_back)
}

fn list_item_lines(item: &ListItem, marker: &str, lines: &mut Vec<Line<'static>>) {
    lines.push(inline_line(marker, &item.inline, Style::default()));
    for nested in &item.nested_lists {
        for sub in &nested.items {
            let marker = format!("{NESTED_INDENT}{BULLET}");
            lines.push(inline_line(&marker, &sub.inline, Style::default()));
        }
    }
}

fn inline_line(marker: &str, inline: &[InlineNode], style: Style) -> Line<'static> {
    let mut spans = Vec::new();
    if !marker.is_empty() {
        spans.push(Span::raw(marker.to_string()));
    }
    inline_spans(inline, style, &mut spans);
    Line::from(spans)
}

fn inline_spans(inline: &[InlineNode], style: Style, spans: &mut Vec<Span<'static>>) {
    for node in inline {
        match node {
            InlineNode::Text(text) => spans.push(Span::styled(text.clone(), style)),
            InlineNode::Bold(children) => {
                inline_spans(children, style.add_modifier(Modifier::BOLD), spans)
            }
            InlineNode::Italic(children) => {
                inline_spans(children, style.add_modifier(Modifier::ITALIC), spans)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwidget_engine::format_reply;
    use pretty_assertions::assert_eq;
    use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
    use rstest::rstest;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[rstest]
    #[case("3. Pizza\n- small\n- large\n7. Pasta", &["1. Pizza", "   • small", "   • large", "2. Pasta"])]
    #[case("<ul><li>one</li><li>two</li></ul>", &["• one", "• two"])]
    #[case("- loose\n- items", &["1. loose", "2. items"])]
    #[case("Intro\n1. A\n- a1", &["Intro", "1. A", "   • a1"])]
    fn lists_render_with_markers(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(plain(&rendered_lines(&format_reply(raw))), expected);
    }

    #[test]
    fn bold_and_italic_become_modifiers() {
        let lines = rendered_lines(&Rendered::Nodes(vec![Node::Paragraph {
            inline: vec![
                InlineNode::Text("a ".into()),
                InlineNode::Bold(vec![
                    InlineNode::Text("b".into()),
                    InlineNode::Italic(vec![InlineNode::Text("c".into())]),
                ]),
            ],
        }]));

        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn headings_are_bold() {
        let lines = rendered_lines(&format_reply("<h2>Opening hours</h2>"));
        assert_eq!(plain(&lines), vec!["Opening hours"]);
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn raw_fallback_is_shown_line_by_line() {
        let lines = rendered_lines(&Rendered::Raw("a <b\nsecond".into()));
        assert_eq!(plain(&lines), vec!["a <b", "second"]);
    }

    #[test]
    fn user_messages_are_prefixed() {
        let lines = message_lines(&ChatMessage::user("first\nsecond"));
        assert_eq!(plain(&lines), vec!["You: first", "     second"]);
    }

    #[rstest]
    #[case(10, 10, 0, 0)]
    #[case(25, 10, 0, 15)]
    #[case(25, 10, 4, 11)]
    #[case(25, 10, 40, 0)]
    fn scroll_offset_pins_to_bottom(
        #[case] rows: usize,
        #[case] height: u16,
        #[case] scroll_back: u16,
        #[case] expected: u16,
    ) {
        assert_eq!(scroll_offset(rows, height, scroll_back), expected);
    }

    #[test]
    fn wrapped_rows_count_towards_the_offset() {
        let long = ChatMessage::bot("word ".repeat(40));
        let paragraph = Paragraph::new(transcript_lines(&[long]))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        let rows = paragraph.line_count(20);
        // 199 characters at 20 columns need at least 10 rows, plus borders
        assert!(rows >= 12);
        assert_eq!(scroll_offset(rows, 6, 0), rows as u16 - 6);
    }

    #[test]
    fn transcript_separates_messages() {
        let messages = vec![ChatMessage::welcome("Hi!"), ChatMessage::user("Hello")];
        assert_eq!(plain(&transcript_lines(&messages)), vec!["Hi!", "", "You: Hello"]);
    }
}
