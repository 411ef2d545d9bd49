//! Error types for source setup and the background fill thread.
//!
//! Lexeme-level anomalies (unknown bytes, unterminated strings or comments)
//! are never errors: they come out of the tokenizer as ordinary tokens.
//! What lives here is the setup path (configuration, opening the byte
//! source, starting the fill thread) and the out-of-band report of a read
//! failure that the token stream itself renders as end-of-input.

use std::io;
use std::path::PathBuf;

/// Failure to set up or cleanly tear down a [`DoubleBufferedSource`](crate::DoubleBufferedSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A chunk capacity of zero bytes was requested.
    #[error("chunk capacity must be at least 1 byte")]
    ZeroCapacity,

    /// The byte source could not be opened.
    #[error("cannot open `{}`: {source}", path.display())]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The background fill thread could not be started.
    #[error("cannot start fill thread: {0}")]
    Spawn(#[source] io::Error),

    /// The byte source failed mid-stream.
    ///
    /// The tokenizer saw this as end-of-input at byte `offset`.
    #[error("read failed after {offset} bytes: {source}")]
    Read {
        /// Bytes successfully delivered before the failure.
        offset: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The background fill thread panicked.
    #[error("fill thread panicked")]
    FillerPanicked,
}
