use crate::formatting::markup::lexer::{TokenKind, lex};
use crate::formatting::markup::tree::Tag;

use super::classify::LineClass;
use super::{inline_markup, strong_pairs};

/// One emitted piece of markup before list coalescing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    /// An `<li>…</li>` fragment, wrapped into an ordered list when coalescing.
    ListItem(String),
    /// A block that stands on its own line.
    Line(String),
}

#[derive(Debug, Default)]
enum BuildState {
    #[default]
    Scanning,
    /// Collecting bullets that belong to the numbered item `content`.
    InNumberedItem {
        content: String,
        bullets: Vec<String>,
    },
}

/// State machine turning classified lines into reply markup.
///
/// While in [`BuildState::InNumberedItem`], blank lines are skipped and bullet
/// lines are collected; any other line closes the item and is then handled
/// as if the builder were scanning.
///
/// Markup lines are tracked for block tags they leave open. While any is
/// open, the caller feeds every line as markup and nothing is wrapped.
#[derive(Debug, Default)]
pub struct MarkupBuilder {
    state: BuildState,
    open_blocks: usize,
    out: Vec<Fragment>,
}

impl MarkupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &LineClass<'_>) {
        if let BuildState::InNumberedItem { bullets, .. } = &mut self.state {
            match line {
                LineClass::Blank => return,
                LineClass::Bullet { content } => {
                    bullets.push((*content).to_string());
                    return;
                }
                _ => self.close_numbered_item(),
            }
        }

        self.scan(line);
    }

    /// Whether a block tag opened by an earlier markup line is still open.
    pub fn in_open_block(&self) -> bool {
        self.open_blocks > 0
    }

    pub fn finish(mut self) -> String {
        // EOF flush
        self.close_numbered_item();
        coalesce(self.out)
    }

    fn scan(&mut self, line: &LineClass<'_>) {
        match *line {
            LineClass::Blank => {}
            LineClass::Numbered { content } => {
                self.state = BuildState::InNumberedItem {
                    content: content.to_string(),
                    bullets: vec![],
                };
            }
            LineClass::Bullet { content } => {
                // Standalone bullet: flat item, no nesting.
                let content = inline_markup(content);
                self.out.push(Fragment::ListItem(format!("<li>{content}</li>")));
            }
            LineClass::Markup { html, list_item } => {
                let inside = self.in_open_block();
                self.track_open_blocks(html);
                let html = strong_pairs(html).into_owned();
                self.out.push(if list_item && !inside {
                    Fragment::ListItem(html)
                } else {
                    Fragment::Line(html)
                });
            }
            LineClass::Text { content } => {
                let content = inline_markup(content);
                self.out.push(Fragment::Line(format!("<p>{content}</p>")));
            }
        }
    }

    fn track_open_blocks(&mut self, html: &str) {
        for token in lex(html) {
            let Some(name) = token.tag_name() else {
                continue;
            };
            if !Tag::from_name(&name).is_block() {
                continue;
            }
            match token.kind {
                TokenKind::OpenTag if !token.is_self_closing() => self.open_blocks += 1,
                TokenKind::CloseTag => self.open_blocks = self.open_blocks.saturating_sub(1),
                _ => {}
            }
        }
    }

    fn close_numbered_item(&mut self) {
        let BuildState::InNumberedItem { content, bullets } = std::mem::take(&mut self.state) else {
            return;
        };

        let mut html = format!("<li>{}", inline_markup(&content));
        if !bullets.is_empty() {
            html.push_str("<ul>");
            for bullet in &bullets {
                html.push_str("<li>");
                html.push_str(&inline_markup(bullet));
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        html.push_str("</li>");
        self.out.push(Fragment::ListItem(html));
    }
}

/// Wraps every maximal run of list item fragments in one `<ol>`.
fn coalesce(fragments: Vec<Fragment>) -> String {
    let mut lines = Vec::new();
    let mut current_list = String::new();

    for fragment in fragments {
        match fragment {
            Fragment::ListItem(item) => current_list.push_str(&item),
            Fragment::Line(line) => {
                if !current_list.is_empty() {
                    lines.push(format!("<ol>{}</ol>", std::mem::take(&mut current_list)));
                }
                lines.push(line);
            }
        }
    }

    if !current_list.is_empty() {
        lines.push(format!("<ol>{current_list}</ol>"));
    }

    lines.join("\n")
}
