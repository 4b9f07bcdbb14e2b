//! Lossless lexer for manifest source.
//!
//! Every byte of the input ends up in exactly one token, so rendering the
//! resulting [`TokenStream`] gives back the original text. Double-quoted
//! strings with `${...}` interpolation are split so the code inside the
//! interpolation is tokenized like any other code. `/* ... */` comments are
//! scanned by hand; an unterminated `/*` is kept as an `Other` token.
//!
//! Heredocs (`@(TAG)` followed by a body ending in `TAG`) are not recognised.
//! Their bodies are lexed as ordinary code, so a body holding an unbalanced
//! `"` fails with [`LexError::UnterminatedString`], and braces inside a body
//! are checked like code braces.

use crate::token::{TokenKind, TokenStream};
use logos::Logos;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\r\n]*")]
    LineComment,

    #[token("/*")]
    BlockCommentStart,

    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token("=")]
    Equals,
    #[token("=>")]
    FarArrow,

    #[token("\"")]
    DoubleQuote,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    #[regex(r"\$(::)?[a-zA-Z_][a-zA-Z0-9_]*(::[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Variable,

    #[regex(r"(::)?[a-z_][a-zA-Z0-9_]*(::[a-z_][a-zA-Z0-9_]*)*")]
    Name,

    #[regex(r"(::)?[A-Z][a-zA-Z0-9_]*(::[A-Z][a-zA-Z0-9_]*)*")]
    ClassRef,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r"==|!=|=~|!~|<=|>=|->|~>|<-|<~|<<|>>|\+=|-=|[+\-*/%<>!|?:;@&^~]")]
    Operator,
}

/// Reserved words that get [`TokenKind::Keyword`].
const KEYWORDS: &[&str] = &[
    "and", "application", "attr", "case", "class", "consumes", "default", "define",
    "false", "function", "import", "in", "node", "or", "plan", "private", "produces",
    "site", "true", "type", "undef",
];

fn keyword_kind(text: &str) -> TokenKind {
    match text {
        "inherits" => TokenKind::Inherits,
        "if" => TokenKind::If,
        "elsif" => TokenKind::Elsif,
        "else" => TokenKind::Else,
        "unless" => TokenKind::Unless,
        _ if KEYWORDS.contains(&text) => TokenKind::Keyword,
        _ => TokenKind::Name,
    }
}

fn token_kind(raw: RawToken, text: &str) -> TokenKind {
    match raw {
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::Newline => TokenKind::Newline,
        RawToken::LineComment => TokenKind::Comment,
        RawToken::BlockCommentStart => TokenKind::Other,
        RawToken::OpenBrace => TokenKind::OpenBrace,
        RawToken::CloseBrace => TokenKind::CloseBrace,
        RawToken::OpenBracket => TokenKind::OpenBracket,
        RawToken::CloseBracket => TokenKind::CloseBracket,
        RawToken::OpenParen => TokenKind::OpenParen,
        RawToken::CloseParen => TokenKind::CloseParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Period => TokenKind::Period,
        RawToken::Equals => TokenKind::Equals,
        RawToken::FarArrow => TokenKind::FarArrow,
        RawToken::DoubleQuote | RawToken::SingleQuoted => TokenKind::String,
        RawToken::Variable => TokenKind::Variable,
        RawToken::Name => keyword_kind(text),
        RawToken::ClassRef => TokenKind::ClassRef,
        RawToken::Number => TokenKind::Number,
        RawToken::Operator => TokenKind::Other,
    }
}

/// How a scanned piece of double-quoted string ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    /// Closing `"` reached
    Closed,
    /// `${` reached
    Interpolation,
}

/// Scan string text up to and including the closing quote or the next `${`.
///
/// Returns the segment kind and the number of bytes consumed, or `None`
/// when the input ends first.
fn scan_string(rest: &str) -> Option<(Segment, usize)> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some((Segment::Closed, i + 1)),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                return Some((Segment::Interpolation, i + 2))
            }
            _ => i += 1,
        }
    }
    None
}

/// An open `${` inside a double-quoted string.
#[derive(Debug)]
struct Interpolation {
    /// Braces opened inside the interpolation and not closed yet
    braces: usize,
    /// Start of the enclosing string
    line: usize,
    column: usize,
}

struct Lexer<'s> {
    source: &'s str,
    stream: TokenStream,
    line: usize,
    column: usize,
    interpolations: Vec<Interpolation>,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stream: TokenStream::new(),
            line: 1,
            column: 1,
            interpolations: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TokenStream, LexError> {
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            let start = raw.span().start;
            let kind = match result {
                Ok(RawToken::DoubleQuote) => {
                    let (segment, len) =
                        scan_string(raw.remainder()).ok_or(LexError::UnterminatedString {
                            line: self.line,
                            column: self.column,
                        })?;
                    raw.bump(len);
                    match segment {
                        Segment::Closed => TokenKind::String,
                        Segment::Interpolation => {
                            self.interpolations.push(Interpolation {
                                braces: 0,
                                line: self.line,
                                column: self.column,
                            });
                            TokenKind::QuoteOpen
                        }
                    }
                }
                Ok(RawToken::BlockCommentStart) => match raw.remainder().find("*/") {
                    Some(end) => {
                        raw.bump(end + 2);
                        TokenKind::Comment
                    }
                    None => TokenKind::Other,
                },
                Ok(RawToken::OpenBrace) => {
                    if let Some(open) = self.interpolations.last_mut() {
                        open.braces += 1;
                    }
                    TokenKind::OpenBrace
                }
                Ok(RawToken::CloseBrace) => match self.interpolations.last_mut() {
                    Some(open) if open.braces > 0 => {
                        open.braces -= 1;
                        TokenKind::CloseBrace
                    }
                    Some(open) => {
                        let unterminated = LexError::UnterminatedString {
                            line: open.line,
                            column: open.column,
                        };
                        let (segment, len) = scan_string(raw.remainder()).ok_or(unterminated)?;
                        raw.bump(len);
                        match segment {
                            Segment::Closed => {
                                self.interpolations.pop();
                                TokenKind::QuoteClose
                            }
                            Segment::Interpolation => TokenKind::QuoteMid,
                        }
                    }
                    None => TokenKind::CloseBrace,
                },
                Ok(other) => token_kind(other, raw.slice()),
                Err(()) => TokenKind::Other,
            };

            let end = raw.span().end;
            self.emit(kind, start, end);
        }

        if let Some(open) = self.interpolations.first() {
            return Err(LexError::UnterminatedString {
                line: open.line,
                column: open.column,
            });
        }

        Ok(self.stream)
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text = &self.source[start..end];
        self.stream.push(kind, text, self.line, self.column);
        for byte in text.bytes() {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

/// Tokenize manifest source.
pub fn lex(source: &str) -> Result<TokenStream, LexError> {
    Lexer::new(source).run()
}
