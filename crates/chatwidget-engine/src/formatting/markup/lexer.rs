//! Tokenizer for reply markup, built on [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Every byte of the input lands in exactly one token. Tags are recognised
//! only by shape; attribute contents are not interpreted. A `<` that starts
//! what looks like a tag name but never reaches `>` is a [`TokenKind::TruncatedTag`],
//! while a `<` followed by anything else is literal text.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>` or `<name .../>`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9]*[^<>]*>")]
    OpenTag,

    /// `</name>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9]*[ \t\r\n]*>")]
    CloseTag,

    /// A tag that is cut off before its closing `>`.
    #[regex(r"</?[a-zA-Z][a-zA-Z0-9]*[^<>]*")]
    TruncatedTag,

    /// A `<` that does not start a tag.
    #[token("<")]
    Lt,

    #[regex(r"[^<]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

impl Token<'_> {
    /// Returns the lowercased tag name of an open or close tag.
    pub fn tag_name(&self) -> Option<String> {
        let rest = match self.kind {
            TokenKind::OpenTag => &self.text[1..],
            TokenKind::CloseTag => &self.text[2..],
            _ => return None,
        };
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        Some(rest[..end].to_ascii_lowercase())
    }

    /// Whether an open tag is written self-closing (`<br/>`).
    pub fn is_self_closing(&self) -> bool {
        self.kind == TokenKind::OpenTag && self.text.ends_with("/>")
    }
}

/// Lex markup into tokens with their byte spans.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        // Every byte is covered by `Lt` or `Text`; treat anything else as text.
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            span: lexer.span(),
        });
    }

    tokens
}
