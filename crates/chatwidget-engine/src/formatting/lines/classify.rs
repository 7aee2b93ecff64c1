use std::sync::OnceLock;

use regex::Regex;

/// Classification of a single reply line containing only local facts.
///
/// Each line is classified independently; grouping bullets under numbered
/// items is the builder's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Whitespace only.
    Blank,
    /// `1. content` (the number itself is discarded).
    Numbered { content: &'a str },
    /// `- content`, `* content` or `• content`.
    Bullet { content: &'a str },
    /// A line that already starts with a block tag (opening or closing), or
    /// sits inside a block left open by an earlier line. Passed through verbatim.
    Markup { html: &'a str, list_item: bool },
    /// Any other non-blank line.
    Text { content: &'a str },
}

/// Classifies reply lines for the markup building phase.
pub struct ReplyLineClassifier;

impl ReplyLineClassifier {
    /// Classifies a line into a [`LineClass`].
    ///
    /// Leading and trailing whitespace is ignored. Structural markers have no
    /// escape: a line starting with `-`, `*`, `•` or `<digits>.` followed by
    /// whitespace is always a list line.
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::Blank;
        }

        if let Some(caps) = numbered_regex().captures(line)
            && let Some(content) = caps.get(2)
        {
            return LineClass::Numbered {
                content: content.as_str(),
            };
        }

        if let Some(content) = bullet_content(line) {
            return LineClass::Bullet { content };
        }

        if let Some(caps) = block_tag_regex().captures(line) {
            let list_item = caps.get(1).is_none()
                && caps
                    .get(2)
                    .is_some_and(|tag| tag.as_str().eq_ignore_ascii_case("li"));
            return LineClass::Markup {
                html: line,
                list_item,
            };
        }

        LineClass::Text { content: line }
    }

    /// Classifies a line known to be inside an open block as markup.
    pub fn markup<'a>(&self, line: &'a str) -> LineClass<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::Blank;
        }
        LineClass::Markup {
            html: line,
            list_item: false,
        }
    }
}

/// Returns the content after a bullet marker, if `line` is a bullet line.
pub fn bullet_content(line: &str) -> Option<&str> {
    bullet_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn numbered_regex() -> &'static Regex {
    static NUMBERED_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBERED_REGEX
        .get_or_init(|| Regex::new(r"^(\d+)\.\s+(.+)").expect("Invalid numbered item regex"))
}

fn bullet_regex() -> &'static Regex {
    static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();
    BULLET_REGEX.get_or_init(|| Regex::new(r"^[-*•]\s+(.+)").expect("Invalid bullet regex"))
}

fn block_tag_regex() -> &'static Regex {
    static BLOCK_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    BLOCK_TAG_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^<(/)?(ol|ul|li|p|h[1-4])[\s>]").expect("Invalid block tag regex")
    })
}
