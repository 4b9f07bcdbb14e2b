//! Token model: lexical units with positions, held in a per-file arena.
//!
//! A [`TokenStream`] owns every token of one manifest. Tokens get a stable
//! [`TokenId`] when they enter the arena, so diagnostics can point at anchor
//! tokens and still find them after earlier fixes have shifted indices.

use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Closed set of token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Comma,
    Period,
    /// Start of an interpolated string, `"text${`
    QuoteOpen,
    /// Text between two interpolations, `}text${`
    QuoteMid,
    /// End of an interpolated string, `}text"`
    QuoteClose,
    Whitespace,
    Newline,
    Comment,
    Name,
    ClassRef,
    Inherits,
    If,
    Elsif,
    Else,
    Unless,
    /// Any other reserved word (`class`, `define`, `node`, ...)
    Keyword,
    Variable,
    /// Quoted string without interpolation
    String,
    Number,
    Equals,
    FarArrow,
    Other,
}

impl TokenKind {
    /// Whitespace and newlines: the only kinds a gap may contain.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Whitespace, newlines and comments.
    pub fn is_trivia(self) -> bool {
        self.is_whitespace() || self == TokenKind::Comment
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::OpenBrace | TokenKind::OpenBracket | TokenKind::OpenParen
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::CloseBrace | TokenKind::CloseBracket | TokenKind::CloseParen
        )
    }
}

/// Stable identity of a token inside one [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lexical unit. Line and column are 1-based; the column counts bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is_single_space(&self) -> bool {
        self.kind == TokenKind::Whitespace && self.text == " "
    }

    /// `#` comments run to the end of the line, so whatever follows them on
    /// the same line becomes part of the comment.
    pub fn is_line_comment(&self) -> bool {
        self.kind == TokenKind::Comment && self.text.starts_with('#')
    }
}

/// Replacement content for one gap: whitespace and newline text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapPiece {
    Whitespace(String),
    Newline(String),
}

impl GapPiece {
    pub fn space() -> Self {
        GapPiece::Whitespace(" ".to_string())
    }

    fn kind(&self) -> TokenKind {
        match self {
            GapPiece::Whitespace(_) => TokenKind::Whitespace,
            GapPiece::Newline(_) => TokenKind::Newline,
        }
    }

    fn into_text(self) -> String {
        match self {
            GapPiece::Whitespace(text) | GapPiece::Newline(text) => text,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GapError {
    #[error("Gap range {start}..{end} is out of bounds for {len} tokens")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Gap contains non-whitespace token {id} ({kind:?})")]
    NonWhitespace { id: TokenId, kind: TokenKind },
}

/// Arena of tokens for a single manifest.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    next_id: u32,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token, returning its id.
    pub fn push(
        &mut self,
        kind: TokenKind,
        text: impl Into<String>,
        line: usize,
        column: usize,
    ) -> TokenId {
        let id = self.allocate_id();
        self.tokens.push(Token {
            id,
            kind,
            text: text.into(),
            line,
            column,
        });
        id
    }

    fn allocate_id(&mut self) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Current index of the token with `id`, if it is still in the stream.
    pub fn position_of(&self, id: TokenId) -> Option<usize> {
        self.tokens.iter().position(|token| token.id == id)
    }

    /// Like [`TokenStream::position_of`], searching outward from `hint`.
    ///
    /// The cost is the distance between `hint` and the token.
    pub fn position_near(&self, id: TokenId, hint: usize) -> Option<usize> {
        let len = self.tokens.len();
        let hint = hint.min(len.checked_sub(1)?);
        let is_id = |index: usize| self.tokens[index].id == id;
        for distance in 0..len {
            let after = hint + distance;
            let before = hint.checked_sub(distance);
            if after >= len && before.is_none() {
                break;
            }
            if after < len && is_id(after) {
                return Some(after);
            }
            if let Some(before) = before.filter(|&before| before != after && is_id(before)) {
                return Some(before);
            }
        }
        None
    }

    /// Index of the closest token before `index` that is not whitespace.
    /// Comments count as content.
    pub fn prev_non_whitespace(&self, index: usize) -> Option<usize> {
        let end = index.min(self.tokens.len());
        self.tokens[..end]
            .iter()
            .rposition(|token| !token.kind.is_whitespace())
    }

    /// Index of the closest token after `index` that is not whitespace.
    /// Comments count as content.
    pub fn next_non_whitespace(&self, index: usize) -> Option<usize> {
        let start = index + 1;
        if start >= self.tokens.len() {
            return None;
        }
        self.tokens[start..]
            .iter()
            .position(|token| !token.kind.is_whitespace())
            .map(|offset| start + offset)
    }

    /// Index of the closest token after `index` that is neither whitespace
    /// nor a comment.
    pub fn next_code(&self, index: usize) -> Option<usize> {
        let start = index + 1;
        if start >= self.tokens.len() {
            return None;
        }
        self.tokens[start..]
            .iter()
            .position(|token| !token.kind.is_trivia())
            .map(|offset| start + offset)
    }

    /// Index of the closest token before `index` that is neither whitespace
    /// nor a comment.
    pub fn prev_code(&self, index: usize) -> Option<usize> {
        let end = index.min(self.tokens.len());
        self.tokens[..end]
            .iter()
            .rposition(|token| !token.kind.is_trivia())
    }

    /// Replace the whitespace tokens in `range` with `pieces`.
    ///
    /// Every token in `range` must be whitespace or a newline; anchors and
    /// comments can never be removed through this method. New tokens get
    /// fresh ids and inherit the position of the first replaced token (or
    /// of the token at `range.start`) until [`TokenStream::reposition`] runs.
    pub fn replace_gap(
        &mut self,
        range: Range<usize>,
        pieces: Vec<GapPiece>,
    ) -> Result<(), GapError> {
        if range.start > range.end || range.end > self.tokens.len() {
            return Err(GapError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: self.tokens.len(),
            });
        }

        if let Some(token) = self.tokens[range.clone()]
            .iter()
            .find(|token| !token.kind.is_whitespace())
        {
            return Err(GapError::NonWhitespace {
                id: token.id,
                kind: token.kind,
            });
        }

        let (line, column) = self
            .tokens
            .get(range.start)
            .map(|token| (token.line, token.column))
            .unwrap_or((0, 0));

        let mut replacement = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let id = self.allocate_id();
            let kind = piece.kind();
            replacement.push(Token {
                id,
                kind,
                text: piece.into_text(),
                line,
                column,
            });
        }

        self.tokens.splice(range, replacement);
        Ok(())
    }

    /// Recompute line and column of every token from the token text.
    pub fn reposition(&mut self) {
        let mut line = 1;
        let mut column = 1;
        for token in &mut self.tokens {
            token.line = line;
            token.column = column;
            for byte in token.text.bytes() {
                if byte == b'\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
        }
    }

    /// Concatenate token text back into source.
    pub fn render(&self) -> String {
        let capacity = self.tokens.iter().map(|token| token.text.len()).sum();
        let mut out = String::with_capacity(capacity);
        for token in &self.tokens {
            out.push_str(&token.text);
        }
        out
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
