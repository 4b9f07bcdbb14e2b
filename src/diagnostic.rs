//! Problems reported by the checks.

use crate::checks::Check;
use crate::classify::GapRule;
use crate::token::{Token, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Problem severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Error,
    Warning,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemKind::Error => f.write_str("error"),
            ProblemKind::Warning => f.write_str("warning"),
        }
    }
}

/// The two tokens bounding the gap a problem is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapAnchors {
    pub left: TokenId,
    pub right: TokenId,
    /// Index of `left` at detection, moved along as earlier fixes resize the
    /// stream
    pub hint: usize,
}

impl GapAnchors {
    pub fn shift(&mut self, delta: isize) {
        self.hint = self.hint.saturating_add_signed(delta);
    }
}

/// A spacing violation found by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: &'static str,
    /// Line of the first offending token in the original source
    pub line: usize,
    /// Column of the first offending token in the original source
    pub column: usize,
    pub check: Check,
    /// Set once a fix has been applied
    pub fixed: bool,
    /// False when the fix is known to be unsafe (a comment sits in the gap)
    pub fixable: bool,
    #[serde(skip)]
    pub anchors: GapAnchors,
    #[serde(skip)]
    pub rule: GapRule,
}

impl Problem {
    /// Create an error problem located at `at`.
    pub fn new(check: Check, at: &Token, anchors: GapAnchors, rule: GapRule) -> Self {
        Self {
            kind: ProblemKind::Error,
            message: check.message(),
            line: at.line,
            column: at.column,
            check,
            fixed: false,
            fixable: true,
            anchors,
            rule,
        }
    }

    #[must_use]
    pub fn unfixable(mut self) -> Self {
        self.fixable = false;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ProblemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ProblemKind::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {} ({})",
            self.line, self.column, self.kind, self.message, self.check
        )
    }
}
