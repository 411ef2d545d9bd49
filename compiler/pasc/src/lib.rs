//! Driver for the Pascal-subset tokenizer.
//!
//! Wraps [`pas_lexer`] with the pieces a command-line tool needs: token
//! records ([`emit`]), the `lex` command ([`commands`]) and tracing setup.

pub mod commands;
pub mod emit;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=pas_lexer=debug` or `RUST_LOG=pas_lexer=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_thread_names(true),
                )
                .with(filter)
                .init();
        }
    });
}
