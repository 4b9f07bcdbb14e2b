//! Per-file lint driver: lex, detect, optionally fix, render.

use crate::checks::{CheckSet, Settings};
use crate::detect::detect;
use crate::diagnostic::Problem;
use crate::lexer::{lex, LexError};
use crate::rewrite::{self, FixOutcome};
use crate::token::TokenStream;
use tracing::debug;

/// Whether a run may rewrite the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    /// Detect only; the output equals the input
    #[default]
    Report,
    /// Apply every fixable problem
    Fix,
}

/// Outcome of linting one source text.
#[derive(Debug, Clone)]
pub struct LintReport {
    pub problems: Vec<Problem>,
    /// Rendered source after fixes (the input itself in report mode)
    pub output: String,
    pub all_fixed: bool,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Error-kind problems that were not fixed.
    pub fn remaining_errors(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .filter(|problem| problem.is_error() && !problem.fixed)
    }

    /// Whether the fixed output differs from what was read.
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }

    /// Undo the fix pass when its output could not be saved.
    pub fn discard_fixes(&mut self, source: &str) {
        for problem in &mut self.problems {
            problem.fixed = false;
        }
        self.all_fixed = self.problems.is_empty();
        self.output = source.to_string();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Linter {
    pub checks: CheckSet,
    pub settings: Settings,
}

impl Linter {
    pub fn new(checks: CheckSet, settings: Settings) -> Self {
        Self { checks, settings }
    }

    /// Problems in `tokens`, sorted by position. Never mutates the stream.
    pub fn detect(&self, tokens: &TokenStream) -> Vec<Problem> {
        detect(tokens, &self.checks, &self.settings)
    }

    /// Fix a single problem in place.
    pub fn fix(&self, tokens: &mut TokenStream, problem: &mut Problem) -> FixOutcome {
        rewrite::fix(tokens, problem)
    }

    /// Lint `source`, fixing problems when `mode` is [`FixMode::Fix`].
    pub fn run(&self, source: &str, mode: FixMode) -> Result<LintReport, LexError> {
        let mut tokens = lex(source)?;
        let mut problems = self.detect(&tokens);

        if mode == FixMode::Fix {
            let mut refused = 0usize;
            // Net tokens added by the fixes so far; later anchors moved by it.
            let mut shift = 0isize;
            for problem in problems.iter_mut().filter(|problem| problem.fixable) {
                problem.anchors.shift(shift);
                match self.fix(&mut tokens, problem) {
                    FixOutcome::Fixed { removed, inserted } => {
                        shift += inserted as isize - removed as isize;
                    }
                    FixOutcome::AlreadyFixed => {}
                    FixOutcome::Refused(_) => refused += 1,
                }
            }
            tokens.reposition();
            debug!(
                problems = problems.len(),
                refused,
                unfixable = problems.iter().filter(|p| !p.fixable).count(),
                "fix pass complete"
            );
        } else {
            debug!(problems = problems.len(), "detect pass complete");
        }

        let all_fixed = problems.iter().all(|problem| problem.fixed);
        Ok(LintReport {
            problems,
            output: tokens.render(),
            all_fixed,
        })
    }
}
