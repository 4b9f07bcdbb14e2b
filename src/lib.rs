//! Manifest Whitespace: whitespace checks with safe auto-fixes for
//! configuration manifests
//!
//! Manifests are lexed into a lossless token stream. Checks find closing
//! braces and `inherits` clauses whose surrounding whitespace is off, and
//! report a [`Problem`] for each. In fix mode the problems are repaired by
//! rewriting only the whitespace between two anchor tokens, so rendering the
//! stream never loses or reorders anything but whitespace.
//!
//! # Architecture
//!
//! - [`lexer`] turns source into a [`TokenStream`] arena with stable
//!   [`TokenId`]s.
//! - [`classify`] decides which spacing a gap must have.
//! - [`detect`] runs the [`Check`]s of a [`CheckSet`] and collects problems.
//! - [`rewrite`] applies one problem's fix, refusing when it would move a
//!   comment.
//! - [`session`] ties these together per file; [`config`] and [`persist`]
//!   serve the command-line driver.
//!
//! # Safety
//!
//! - Fixes re-validate the live gap before rewriting
//! - Non-whitespace tokens are never removed
//! - Files are written atomically, and only if unchanged since they were read

pub mod checks;
pub mod classify;
pub mod config;
pub mod detect;
pub mod diagnostic;
pub mod lexer;
pub mod persist;
pub mod rewrite;
pub mod session;
pub mod token;

// Re-exports
pub use checks::{Check, CheckSet, Settings};
pub use classify::{AfterClass, BeforeClass, GapRule, TightSet};
pub use config::{
    discover, load_from_path, load_from_str, ConfigError, ConfigSource, LintConfig, LoadedConfig,
};
pub use diagnostic::{GapAnchors, Problem, ProblemKind};
pub use lexer::{lex, LexError};
pub use persist::{LoadedFile, PersistError};
pub use rewrite::{FixOutcome, RefusalReason};
pub use session::{FixMode, LintReport, Linter};
pub use token::{GapError, GapPiece, Token, TokenId, TokenKind, TokenStream};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
