//! Violation detection over a token stream.
//!
//! Detection is read-only. All problems for a file are collected before any
//! fix runs, so positions always refer to the original stream.

use crate::checks::{Check, CheckSet, Settings};
use crate::classify::{expression_braces, GapRule};
use crate::diagnostic::{GapAnchors, Problem};
use crate::token::{Token, TokenKind, TokenStream};

/// Matching partner of every delimiter token, `None` for everything else and
/// for unmatched delimiters.
///
/// Braces, brackets and parentheses are matched on separate stacks, so an
/// unclosed `[` cannot throw off brace matching.
pub fn match_delimiters(tokens: &TokenStream) -> Vec<Option<usize>> {
    let mut partner = vec![None; tokens.len()];
    let mut braces = Vec::new();
    let mut brackets = Vec::new();
    let mut parens = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        let stack = match token.kind {
            TokenKind::OpenBrace | TokenKind::CloseBrace => &mut braces,
            TokenKind::OpenBracket | TokenKind::CloseBracket => &mut brackets,
            TokenKind::OpenParen | TokenKind::CloseParen => &mut parens,
            _ => continue,
        };

        if token.kind.is_opener() {
            stack.push(index);
        } else if let Some(open) = stack.pop() {
            partner[open] = Some(index);
            partner[index] = Some(open);
        }
    }

    partner
}

/// Everything a check needs to scan one file.
pub struct ScanContext<'a> {
    pub tokens: &'a TokenStream,
    pub settings: &'a Settings,
    partner: Vec<Option<usize>>,
    expression: Vec<bool>,
}

impl<'a> ScanContext<'a> {
    pub fn new(tokens: &'a TokenStream, settings: &'a Settings) -> Self {
        let partner = match_delimiters(tokens);
        let expression = if settings.check_expression_braces {
            vec![false; tokens.len()]
        } else {
            expression_braces(tokens, &partner)
        };
        Self {
            tokens,
            settings,
            partner,
            expression,
        }
    }

    pub fn token(&self, index: usize) -> &'a Token {
        &self.tokens.tokens()[index]
    }

    /// Index of the matching delimiter, if any.
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partner.get(index).copied().flatten()
    }

    /// Closing braces the brace checks look at: matched, and not part of a
    /// conditional in value position unless configured otherwise.
    pub fn checked_close_braces(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(index, token)| {
                token.kind == TokenKind::CloseBrace
                    && self.partner(*index).is_some()
                    && !self.expression[*index]
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Tokens strictly between `left` and `right`.
    pub fn gap(&self, left: usize, right: usize) -> &'a [Token] {
        &self.tokens.tokens()[left + 1..right]
    }

    /// Build a problem for the gap between `left` and `right`, located at the
    /// first gap token, or at `right` when the gap is empty.
    pub fn problem(&self, check: Check, left: usize, right: usize, rule: GapRule) -> Problem {
        let at = if left + 1 < right {
            self.token(left + 1)
        } else {
            self.token(right)
        };
        let anchors = GapAnchors {
            left: self.token(left).id,
            right: self.token(right).id,
            hint: left,
        };
        Problem::new(check, at, anchors, rule).with_kind(self.settings.severity_of(check))
    }
}

/// Run `checks` over `tokens` and return the problems sorted by position.
pub fn detect(tokens: &TokenStream, checks: &CheckSet, settings: &Settings) -> Vec<Problem> {
    let ctx = ScanContext::new(tokens, settings);
    let mut problems = Vec::new();
    for check in checks.iter() {
        check.scan(&ctx, &mut problems);
    }
    problems.sort_by_key(|problem| (problem.line, problem.column, problem.check));
    problems
}
