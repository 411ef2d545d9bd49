//! Token records.
//!
//! One line per token, tab-separated, ending with the EOF record:
//!
//! ```text
//! KEYWORD\tprogram\t1:0
//! ID\tdemo\t1:8
//! EOF\t<EOF>\t1:12
//! ```

use std::fmt;
use std::io::{self, Write};

use pas_lexer::Token;

/// Display adapter producing one record without the trailing newline.
pub struct Record<'a>(pub &'a Token);

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self.0;
        write!(
            f,
            "{}\t{}\t{}:{}",
            token.kind, token.lexeme, token.line, token.column
        )
    }
}

/// Writes token records to any [`Write`] sink.
pub struct TokenWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> TokenWriter<W> {
    pub fn new(out: W) -> Self {
        TokenWriter { out, written: 0 }
    }

    /// Write one record.
    pub fn write_token(&mut self, token: &Token) -> io::Result<()> {
        writeln!(self.out, "{}", Record(token))?;
        self.written += 1;
        Ok(())
    }

    /// Write every remaining token, EOF included. Returns how many were
    /// written by this call.
    pub fn write_all<I>(&mut self, tokens: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = Token>,
    {
        let before = self.written;
        for token in tokens {
            self.write_token(&token)?;
        }
        Ok(self.written - before)
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
