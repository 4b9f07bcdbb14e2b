//! Gap classification: which spacing a gap must have, and how to repair it.
//!
//! A gap is the run of whitespace and newline tokens between two anchors.
//! Classification looks only at the anchors and the gap itself, so the same
//! [`GapRule`] can be re-checked against the live stream at fix time.

use crate::token::{GapPiece, Token, TokenKind, TokenStream};

/// Spacing required between the last content token and a closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeClass {
    /// `{` directly followed by `}` on the same line: no whitespace at all
    EmptyPair,
    /// The brace sits on its own line: exactly one newline before it
    LineBreakBody,
    /// The brace closes a same-line body: exactly one space before it
    InlineBody,
}

/// Spacing required between a closing brace and the token after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterClass {
    /// Next token is in the tight set: no whitespace
    Tight,
    /// Next token is another closing brace: nothing or one space
    Nested,
    /// Any other next token: one space
    Loose,
}

/// The rule a gap is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapRule {
    Before(BeforeClass),
    After(AfterClass),
    /// Exactly one space and nothing else
    SingleSpace,
}

impl GapRule {
    /// Whether `gap` already satisfies this rule.
    pub fn accepts(self, gap: &[Token]) -> bool {
        match self {
            GapRule::Before(BeforeClass::EmptyPair) => gap.is_empty(),
            GapRule::Before(BeforeClass::LineBreakBody) => newline_count(gap) == 1,
            GapRule::Before(BeforeClass::InlineBody) | GapRule::SingleSpace => {
                is_single_space(gap)
            }
            GapRule::After(_) if has_newline(gap) => true,
            GapRule::After(AfterClass::Tight) => gap.is_empty(),
            GapRule::After(AfterClass::Nested) => gap.is_empty() || is_single_space(gap),
            GapRule::After(AfterClass::Loose) => is_single_space(gap),
        }
    }

    /// Minimal replacement for `gap` that satisfies this rule.
    pub fn repair(self, gap: &[Token]) -> Vec<GapPiece> {
        match self {
            GapRule::Before(BeforeClass::EmptyPair) | GapRule::After(AfterClass::Tight) => {
                Vec::new()
            }
            GapRule::Before(BeforeClass::LineBreakBody) => collapse_newlines(gap),
            GapRule::Before(BeforeClass::InlineBody)
            | GapRule::After(AfterClass::Nested)
            | GapRule::After(AfterClass::Loose)
            | GapRule::SingleSpace => vec![GapPiece::space()],
        }
    }
}

pub fn has_newline(gap: &[Token]) -> bool {
    gap.iter().any(|token| token.kind == TokenKind::Newline)
}

pub fn newline_count(gap: &[Token]) -> usize {
    gap.iter()
        .filter(|token| token.kind == TokenKind::Newline)
        .count()
}

pub fn is_single_space(gap: &[Token]) -> bool {
    matches!(gap, [only] if only.is_single_space())
}

/// Keep everything up to the first newline plus the indentation after the
/// last one.
fn collapse_newlines(gap: &[Token]) -> Vec<GapPiece> {
    let first = gap.iter().position(|token| token.kind == TokenKind::Newline);
    let last = gap.iter().rposition(|token| token.kind == TokenKind::Newline);
    let (Some(first), Some(last)) = (first, last) else {
        return vec![GapPiece::Newline("\n".to_string())];
    };

    gap[..=first]
        .iter()
        .chain(&gap[last + 1..])
        .map(to_piece)
        .collect()
}

fn to_piece(token: &Token) -> GapPiece {
    if token.kind == TokenKind::Newline {
        GapPiece::Newline(token.text.clone())
    } else {
        GapPiece::Whitespace(token.text.clone())
    }
}

/// Classify the gap before a closing brace.
///
/// `after_opener` is true when the token before the gap is the brace's own
/// opening brace.
pub fn classify_before(after_opener: bool, gap: &[Token]) -> BeforeClass {
    if has_newline(gap) {
        BeforeClass::LineBreakBody
    } else if after_opener {
        BeforeClass::EmptyPair
    } else {
        BeforeClass::InlineBody
    }
}

/// Classify the gap after a closing brace by the token that follows it.
pub fn classify_after(next: &Token, tight: &TightSet) -> AfterClass {
    if next.kind == TokenKind::CloseBrace {
        AfterClass::Nested
    } else if tight.contains(next) {
        AfterClass::Tight
    } else {
        AfterClass::Loose
    }
}

/// Tokens that must follow a closing brace without whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TightSet {
    kinds: Vec<TokenKind>,
    texts: Vec<String>,
}

impl Default for TightSet {
    fn default() -> Self {
        Self {
            kinds: vec![
                TokenKind::CloseParen,
                TokenKind::CloseBracket,
                TokenKind::Comma,
                TokenKind::Period,
                TokenKind::QuoteClose,
                TokenKind::QuoteMid,
            ],
            texts: Vec::new(),
        }
    }
}

impl TightSet {
    /// Default set extended with literal token texts (e.g. `;`).
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.texts.extend(texts.into_iter().map(Into::into));
        set
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.kinds.contains(&token.kind) || self.texts.iter().any(|text| *text == token.text)
    }
}

/// Mark the braces of conditionals used as values.
///
/// `$x = if $c { 1 } else { 2 }` and `'k' => unless $c { ... }` produce
/// braces in expression position. Returns one flag per token; both braces
/// of every branch in such a chain are marked.
pub fn expression_braces(tokens: &TokenStream, partner: &[Option<usize>]) -> Vec<bool> {
    let mut marked = vec![false; tokens.len()];

    for (index, token) in tokens.iter().enumerate() {
        if !matches!(token.kind, TokenKind::If | TokenKind::Unless) {
            continue;
        }
        let introduced_by_value = tokens
            .prev_code(index)
            .and_then(|prev| tokens.get(prev))
            .is_some_and(|prev| matches!(prev.kind, TokenKind::Equals | TokenKind::FarArrow));
        if !introduced_by_value {
            continue;
        }

        let mut cursor = index;
        while let Some(open) = branch_open(tokens, partner, cursor) {
            let Some(close) = partner.get(open).copied().flatten() else {
                break;
            };
            marked[open] = true;
            marked[close] = true;

            match tokens.next_code(close).and_then(|next| tokens.get(next).map(|t| (next, t))) {
                Some((next, t)) if matches!(t.kind, TokenKind::Else | TokenKind::Elsif) => {
                    cursor = next;
                }
                _ => break,
            }
        }
    }

    marked
}

/// First `{` after `from` that is not inside parentheses or brackets.
fn branch_open(tokens: &TokenStream, partner: &[Option<usize>], from: usize) -> Option<usize> {
    let mut index = from + 1;
    while let Some(token) = tokens.get(index) {
        match token.kind {
            TokenKind::OpenBrace => return Some(index),
            TokenKind::OpenParen | TokenKind::OpenBracket => {
                index = partner.get(index).copied().flatten()? + 1;
            }
            _ => index += 1,
        }
    }
    None
}
