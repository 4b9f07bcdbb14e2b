//! The whitespace checks.
//!
//! The rule set is closed: every check is a [`Check`] variant and dispatch is
//! a `match`. A [`CheckSet`] picks which of them run.

pub mod closing_brace;
pub mod inherits;

use crate::classify::TightSet;
use crate::detect::ScanContext;
use crate::diagnostic::{Problem, ProblemKind};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Check {
    #[serde(rename = "manifest_whitespace_inherits_name_single_space_before")]
    InheritsNameSingleSpaceBefore,
    #[serde(rename = "manifest_whitespace_inherits_name_single_space_after")]
    InheritsNameSingleSpaceAfter,
    #[serde(rename = "manifest_whitespace_closing_brace_before")]
    ClosingBraceBefore,
    #[serde(rename = "manifest_whitespace_closing_brace_after")]
    ClosingBraceAfter,
}

impl Check {
    pub const ALL: [Check; 4] = [
        Check::InheritsNameSingleSpaceBefore,
        Check::InheritsNameSingleSpaceAfter,
        Check::ClosingBraceBefore,
        Check::ClosingBraceAfter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::InheritsNameSingleSpaceBefore => {
                "manifest_whitespace_inherits_name_single_space_before"
            }
            Check::InheritsNameSingleSpaceAfter => {
                "manifest_whitespace_inherits_name_single_space_after"
            }
            Check::ClosingBraceBefore => "manifest_whitespace_closing_brace_before",
            Check::ClosingBraceAfter => "manifest_whitespace_closing_brace_after",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Check::InheritsNameSingleSpaceBefore => {
                "there should be a single space between the inherits statement and the name"
            }
            Check::InheritsNameSingleSpaceAfter => {
                "there should be a single space between the class or resource name and the first bracket"
            }
            Check::ClosingBraceBefore => {
                "there should be a single space or newline before a closing brace"
            }
            Check::ClosingBraceAfter => {
                "there should be either a bracket, punctuation mark, closing quote or a newline after a closing brace, or whitespace and none of the aforementioned"
            }
        }
    }

    /// Look a check up by its full name.
    pub fn from_name(name: &str) -> Option<Check> {
        Check::ALL.into_iter().find(|check| check.name() == name)
    }

    pub fn all_names() -> impl Iterator<Item = &'static str> {
        Check::ALL.into_iter().map(Check::name)
    }

    /// Run this check over the stream in `ctx`, appending to `out`.
    pub fn scan(self, ctx: &ScanContext<'_>, out: &mut Vec<Problem>) {
        match self {
            Check::InheritsNameSingleSpaceBefore => inherits::scan_before(ctx, out),
            Check::InheritsNameSingleSpaceAfter => inherits::scan_after(ctx, out),
            Check::ClosingBraceBefore => closing_brace::scan_before(ctx, out),
            Check::ClosingBraceAfter => closing_brace::scan_after(ctx, out),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The checks that run for a file, in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSet {
    checks: Vec<Check>,
}

impl Default for CheckSet {
    fn default() -> Self {
        Self::all()
    }
}

impl CheckSet {
    pub fn all() -> Self {
        Self {
            checks: Check::ALL.to_vec(),
        }
    }

    pub fn only(checks: impl IntoIterator<Item = Check>) -> Self {
        let mut checks: Vec<Check> = checks.into_iter().collect();
        checks.sort();
        checks.dedup();
        Self { checks }
    }

    #[must_use]
    pub fn without(mut self, check: Check) -> Self {
        self.checks.retain(|c| *c != check);
        self
    }

    pub fn contains(&self, check: Check) -> bool {
        self.checks.contains(&check)
    }

    pub fn iter(&self) -> impl Iterator<Item = Check> + '_ {
        self.checks.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Knobs shared by all checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub tight: TightSet,
    /// Check braces of conditionals in value position like ordinary braces
    pub check_expression_braces: bool,
    pub severity: HashMap<Check, ProblemKind>,
}

impl Settings {
    pub fn severity_of(&self, check: Check) -> ProblemKind {
        self.severity
            .get(&check)
            .copied()
            .unwrap_or(ProblemKind::Error)
    }
}
