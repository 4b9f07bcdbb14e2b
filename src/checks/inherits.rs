//! Spacing around the parent name of `class ... inherits parent { ... }`.

use crate::checks::Check;
use crate::classify::GapRule;
use crate::detect::ScanContext;
use crate::diagnostic::Problem;
use crate::token::{Token, TokenKind};

/// Index of the parent name following `inherits` at `keyword`.
fn parent_name(ctx: &ScanContext<'_>, keyword: usize) -> Option<usize> {
    let name = ctx.tokens.next_code(keyword)?;
    matches!(ctx.token(name).kind, TokenKind::Name | TokenKind::ClassRef).then_some(name)
}

fn inherits_keywords(ctx: &ScanContext<'_>) -> Vec<usize> {
    ctx.tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.kind == TokenKind::Inherits)
        .map(|(index, _)| index)
        .collect()
}

fn has_comment(gap: &[Token]) -> bool {
    gap.iter().any(|token| token.kind == TokenKind::Comment)
}

fn single_space_problem(
    ctx: &ScanContext<'_>,
    check: Check,
    left: usize,
    right: usize,
) -> Option<Problem> {
    let gap = ctx.gap(left, right);
    if GapRule::SingleSpace.accepts(gap) {
        return None;
    }
    let problem = ctx.problem(check, left, right, GapRule::SingleSpace);
    Some(if has_comment(gap) {
        problem.unfixable()
    } else {
        problem
    })
}

/// `manifest_whitespace_inherits_name_single_space_before`
pub fn scan_before(ctx: &ScanContext<'_>, out: &mut Vec<Problem>) {
    for keyword in inherits_keywords(ctx) {
        let Some(name) = parent_name(ctx, keyword) else {
            continue;
        };
        out.extend(single_space_problem(
            ctx,
            Check::InheritsNameSingleSpaceBefore,
            keyword,
            name,
        ));
    }
}

/// `manifest_whitespace_inherits_name_single_space_after`
pub fn scan_after(ctx: &ScanContext<'_>, out: &mut Vec<Problem>) {
    for keyword in inherits_keywords(ctx) {
        let Some(name) = parent_name(ctx, keyword) else {
            continue;
        };
        let Some(brace) = ctx.tokens.next_code(name) else {
            continue;
        };
        if ctx.token(brace).kind != TokenKind::OpenBrace {
            continue;
        }
        out.extend(single_space_problem(
            ctx,
            Check::InheritsNameSingleSpaceAfter,
            name,
            brace,
        ));
    }
}
