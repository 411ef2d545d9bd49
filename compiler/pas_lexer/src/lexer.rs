//! Tokenizer driven one byte at a time by a [`DoubleBufferedSource`].
//!
//! # Design
//!
//! Each call to [`Lexer::next_token`] skips whitespace and comments, records
//! the position of the first significant byte, and dispatches on that byte.
//! All lookahead is a single [`bump`](Lexer::bump) followed by at most one
//! [`unbump`](Lexer::unbump), which is the one byte of lookback the source
//! guarantees. Where a chunk boundary falls never changes the result.
//!
//! Malformed input never fails: a byte nothing accepts becomes an `UNKNOWN`
//! token, an unterminated string runs to end of input, and an unterminated
//! comment swallows the rest of the input.
//!
//! Bytes map to characters one-to-one (`char::from(u8)`); character classes
//! are ASCII.

use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

use tracing::{debug, trace};

use crate::keywords::is_keyword;
use crate::token::{Token, TokenKind, EOF_LEXEME};
use crate::{DoubleBufferedSource, SourceConfig, SourceError};

/// Pascal-subset tokenizer over a double-buffered byte source.
pub struct Lexer {
    source: DoubleBufferedSource,
    /// 1-based line of the next byte.
    line: u32,
    /// 0-based column of the next byte.
    column: u32,
    /// Column before the most recent newline; restores it on `unbump`.
    column_before_newline: u32,
    /// Last byte returned by `bump`, until it is pushed back.
    last: Option<u8>,
    /// The EOF token has been produced.
    finished: bool,
}

impl Lexer {
    pub fn new(source: DoubleBufferedSource) -> Self {
        Lexer {
            source,
            line: 1,
            column: 0,
            column_before_newline: 0,
            last: None,
            finished: false,
        }
    }

    /// Tokenize any byte stream.
    pub fn from_reader<R>(reader: R, config: SourceConfig) -> Result<Self, SourceError>
    where
        R: Read + Send + 'static,
    {
        Ok(Self::new(DoubleBufferedSource::new(reader, config)?))
    }

    /// Tokenize the file at `path`. Open failures are returned here.
    pub fn open(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self, SourceError> {
        Ok(Self::new(DoubleBufferedSource::open(path, config)?))
    }

    /// Position `(line, column)` of the next unread byte.
    pub fn pos(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Whether the EOF token has been returned.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Produce the next token.
    ///
    /// The stream ends with exactly one [`TokenKind::Eof`] token. Calling
    /// this again after EOF is a precondition violation (checked in debug
    /// builds); the [`Iterator`] impl stops cleanly instead.
    pub fn next_token(&mut self) -> Token {
        debug_assert!(!self.finished, "next_token called after EOF");
        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);

            let Some(first) = self.bump() else {
                self.finished = true;
                trace!(line, column, "eof");
                return Token::new(TokenKind::Eof, EOF_LEXEME, line, column);
            };

            let token = match first {
                b'{' => {
                    self.skip_brace_comment(line, column);
                    continue;
                }
                b'(' if self.eat(b'*') => {
                    self.skip_paren_comment(line, column);
                    continue;
                }
                b'\'' => self.string(line, column),
                b if b.is_ascii_alphabetic() => self.word(first, line, column),
                b if b.is_ascii_digit() => self.number(first, line, column),
                _ => self.operator_or_delimiter(first, line, column),
            };
            trace!(kind = %token.kind, lexeme = %token.lexeme, line, column, "token");
            return token;
        }
    }

    /// Stop the source and report a mid-stream read failure, if one
    /// occurred.
    pub fn finish(self) -> Result<(), SourceError> {
        self.source.close()
    }

    // ─── Byte access ───────────────────────────────────────────────

    /// Consume one byte, updating the position.
    fn bump(&mut self) -> Option<u8> {
        let byte = self.source.next_char()?;
        if byte == b'\n' {
            self.column_before_newline = self.column;
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.last = Some(byte);
        Some(byte)
    }

    /// Un-consume the byte returned by the last `bump`.
    fn unbump(&mut self) {
        if !self.source.push_back() {
            return;
        }
        match self.last.take() {
            Some(b'\n') => {
                self.line = self.line.saturating_sub(1);
                self.column = self.column_before_newline;
            }
            Some(_) => self.column = self.column.saturating_sub(1),
            None => {}
        }
    }

    /// Consume the next byte only if it is `want`.
    fn eat(&mut self, want: u8) -> bool {
        match self.bump() {
            Some(b) if b == want => true,
            Some(_) => {
                self.unbump();
                false
            }
            None => false,
        }
    }

    /// Append bytes to `text` while `accept` holds; the first rejected byte
    /// is pushed back.
    fn take_while(&mut self, text: &mut String, accept: impl Fn(u8) -> bool) {
        while let Some(b) = self.bump() {
            if !accept(b) {
                self.unbump();
                return;
            }
            text.push(char::from(b));
        }
    }

    // ─── Trivia ────────────────────────────────────────────────────

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.bump() {
            if !is_whitespace(b) {
                self.unbump();
                return;
            }
        }
    }

    /// Skip past the closing `}`. The opening `{` is already consumed.
    fn skip_brace_comment(&mut self, line: u32, column: u32) {
        loop {
            match self.bump() {
                Some(b'}') => return,
                Some(_) => {}
                None => {
                    debug!(line, column, "unterminated brace comment");
                    return;
                }
            }
        }
    }

    /// Skip past the first `*)`. The opening `(*` is already consumed, so
    /// `(*)` does not close itself.
    fn skip_paren_comment(&mut self, line: u32, column: u32) {
        let mut after_star = false;
        loop {
            match self.bump() {
                Some(b')') if after_star => return,
                Some(b) => after_star = b == b'*',
                None => {
                    debug!(line, column, "unterminated paren comment");
                    return;
                }
            }
        }
    }

    // ─── Lexemes ───────────────────────────────────────────────────

    /// String literal; the opening quote is already consumed. `''` inside
    /// the literal is an embedded quote.
    fn string(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::from("'");
        loop {
            let Some(b) = self.bump() else {
                debug!(line, column, "unterminated string literal");
                break;
            };
            text.push(char::from(b));
            if b == b'\'' {
                if self.eat(b'\'') {
                    text.push('\'');
                    continue;
                }
                break;
            }
        }
        Token::new(TokenKind::String, text, line, column)
    }

    fn word(&mut self, first: u8, line: u32, column: u32) -> Token {
        let mut text = String::from(char::from(first));
        self.take_while(&mut text, |b| b.is_ascii_alphanumeric() || b == b'_');
        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Id
        };
        Token::new(kind, text, line, column)
    }

    fn number(&mut self, first: u8, line: u32, column: u32) -> Token {
        let mut text = String::from(char::from(first));
        self.take_while(&mut text, |b| b.is_ascii_digit());
        Token::new(TokenKind::Num, text, line, column)
    }

    /// Two-byte forms win over their one-byte prefixes.
    fn operator_or_delimiter(&mut self, first: u8, line: u32, column: u32) -> Token {
        if let Some(second) = self.bump() {
            if let Some(kind) = pair_kind(first, second) {
                let text: String = [char::from(first), char::from(second)].iter().collect();
                return Token::new(kind, text, line, column);
            }
            self.unbump();
        }
        Token::new(single_kind(first), char::from(first), line, column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Every token up to and including EOF, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

impl FusedIterator for Lexer {}

/// Whitespace: space, `\t`, `\n`, `\r`, vertical tab, form feed.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Classification of a two-byte operator or delimiter.
fn pair_kind(first: u8, second: u8) -> Option<TokenKind> {
    match (first, second) {
        (b'<', b'=') | (b'>', b'=') | (b'<', b'>') | (b':', b'=') => Some(TokenKind::Op),
        // Range dots are a delimiter, unlike every other pair.
        (b'.', b'.') => Some(TokenKind::Delim),
        _ => None,
    }
}

fn single_kind(b: u8) -> TokenKind {
    match b {
        b'+' | b'-' | b'*' | b'/' | b'=' | b'<' | b'>' | b':' => TokenKind::Op,
        b';' | b',' | b'.' | b'(' | b')' | b'[' | b']' => TokenKind::Delim,
        _ => TokenKind::Unknown,
    }
}
