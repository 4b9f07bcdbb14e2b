//! Spacing around closing braces.

use crate::checks::Check;
use crate::classify::{classify_after, classify_before, GapRule};
use crate::detect::ScanContext;
use crate::diagnostic::Problem;
use crate::token::TokenKind;

/// `manifest_whitespace_closing_brace_before`
pub fn scan_before(ctx: &ScanContext<'_>, out: &mut Vec<Problem>) {
    for brace in ctx.checked_close_braces() {
        let Some(prev) = ctx.tokens.prev_non_whitespace(brace) else {
            continue;
        };

        let gap = ctx.gap(prev, brace);
        let after_opener =
            ctx.token(prev).kind == TokenKind::OpenBrace && ctx.partner(brace) == Some(prev);
        let rule = GapRule::Before(classify_before(after_opener, gap));

        if !rule.accepts(gap) {
            out.push(ctx.problem(Check::ClosingBraceBefore, prev, brace, rule));
        }
    }
}

/// `manifest_whitespace_closing_brace_after`
pub fn scan_after(ctx: &ScanContext<'_>, out: &mut Vec<Problem>) {
    for brace in ctx.checked_close_braces() {
        // Nothing after the brace is always fine.
        let Some(next) = ctx.tokens.next_non_whitespace(brace) else {
            continue;
        };

        let gap = ctx.gap(brace, next);
        let rule = GapRule::After(classify_after(ctx.token(next), &ctx.settings.tight));

        if !rule.accepts(gap) {
            out.push(ctx.problem(Check::ClosingBraceAfter, brace, next, rule));
        }
    }
}
