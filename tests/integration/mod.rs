//! Golden tests over whole manifests, plus the command-line driver.

mod cli;
mod closing_brace;
mod inherits;
mod properties;

use manifest_whitespace::{Check, CheckSet, FixMode, LintReport, Linter, Settings};

/// Lint `source` with `check` alone.
pub fn run_check(check: Check, source: &str, mode: FixMode) -> LintReport {
    Linter::new(CheckSet::only([check]), Settings::default())
        .run(source, mode)
        .unwrap()
}

/// `(line, column)` of every problem.
pub fn positions(report: &LintReport) -> Vec<(usize, usize)> {
    report.problems.iter().map(|p| (p.line, p.column)).collect()
}
