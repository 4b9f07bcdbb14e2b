//! Safe rewriting of a single gap.
//!
//! A fix only ever touches the whitespace between a problem's two anchors.
//! The anchors are looked up by id in the live stream, so fixes applied
//! earlier in the same pass do not invalidate later ones.

use crate::diagnostic::Problem;
use crate::token::{GapError, GapPiece, TokenStream};
use thiserror::Error;
use tracing::trace;

/// Why a fix was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefusalReason {
    #[error("Anchor token is no longer in the stream")]
    AnchorMissing,

    #[error("A comment sits in the gap")]
    CommentInGap,

    #[error("Removing the newline would pull the next token into a line comment")]
    WouldJoinLineComment,

    #[error("Gap rejected by the token stream: {0}")]
    Gap(#[from] GapError),
}

/// Result of trying to fix one problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FixOutcome should be checked for refusal"]
pub enum FixOutcome {
    /// The gap was rewritten
    Fixed { removed: usize, inserted: usize },
    /// The gap already had the required form (an earlier fix normalized it)
    AlreadyFixed,
    /// The stream was left untouched
    Refused(RefusalReason),
}

impl FixOutcome {
    pub fn is_fixed(&self) -> bool {
        matches!(self, FixOutcome::Fixed { .. } | FixOutcome::AlreadyFixed)
    }
}

/// Rewrite the gap of `problem` in `tokens` to its required form.
///
/// On success `problem.fixed` is set. On refusal neither the stream nor the
/// problem changes.
pub fn fix(tokens: &mut TokenStream, problem: &mut Problem) -> FixOutcome {
    let outcome = rewrite_gap(tokens, problem);
    trace!(
        check = %problem.check,
        line = problem.line,
        column = problem.column,
        ?outcome,
        "fix"
    );
    if outcome.is_fixed() {
        problem.fixed = true;
    }
    outcome
}

fn rewrite_gap(tokens: &mut TokenStream, problem: &Problem) -> FixOutcome {
    let Some(left) = tokens.position_near(problem.anchors.left, problem.anchors.hint) else {
        return FixOutcome::Refused(RefusalReason::AnchorMissing);
    };
    let Some(right) = tokens.position_near(problem.anchors.right, left + 1) else {
        return FixOutcome::Refused(RefusalReason::AnchorMissing);
    };
    if left >= right {
        return FixOutcome::Refused(RefusalReason::AnchorMissing);
    }

    let gap = &tokens.tokens()[left + 1..right];
    if problem.rule.accepts(gap) {
        return FixOutcome::AlreadyFixed;
    }
    if gap.iter().any(|token| !token.kind.is_whitespace()) {
        return FixOutcome::Refused(RefusalReason::CommentInGap);
    }

    let pieces = problem.rule.repair(gap);
    let keeps_newline = pieces
        .iter()
        .any(|piece| matches!(piece, GapPiece::Newline(_)));
    if tokens.tokens()[left].is_line_comment() && !keeps_newline {
        return FixOutcome::Refused(RefusalReason::WouldJoinLineComment);
    }

    let removed = right - left - 1;
    let inserted = pieces.len();
    match tokens.replace_gap(left + 1..right, pieces) {
        Ok(()) => FixOutcome::Fixed { removed, inserted },
        Err(err) => FixOutcome::Refused(err.into()),
    }
}
