//! Double-buffered lexical front end for a Pascal subset.
//!
//! A background thread fills one of two fixed-capacity slots from a byte
//! source while the [`Lexer`] drains the other, one byte at a time, and
//! turns it into [`Token`]s with 1-based lines and 0-based columns.
//!
//! ```no_run
//! use pas_lexer::{Lexer, SourceConfig};
//!
//! # fn main() -> Result<(), pas_lexer::SourceError> {
//! let mut lexer = Lexer::open("demo.pas", SourceConfig::default())?;
//! loop {
//!     let token = lexer.next_token();
//!     println!("{token}");
//!     if token.is_eof() {
//!         break;
//!     }
//! }
//! lexer.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Layers
//!
//! - [`DoubleBufferedSource`]: the two slots, the fill thread and the
//!   consumer cursor, exposing `next_char` / `push_back`.
//! - [`Lexer`]: the tokenizer state machine on top of it.
//!
//! The token stream never depends on the chunk capacity or on thread
//! timing.

mod config;
mod error;
mod keywords;
mod lexer;
mod slot;
mod source;
mod token;

pub use config::{SourceConfig, DEFAULT_CAPACITY, DEFAULT_POLL_INTERVAL};
pub use error::SourceError;
pub use keywords::{is_keyword, KEYWORDS};
pub use lexer::Lexer;
pub use source::DoubleBufferedSource;
pub use token::{Token, TokenKind, EOF_LEXEME};
