//! Token values produced by the [`Lexer`](crate::Lexer).

use std::fmt;

/// Lexeme used for the terminal EOF token.
pub const EOF_LEXEME: &str = "<EOF>";

/// Token classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Always the last token.
    Eof,
    /// Single-quoted string literal, quotes included.
    String,
    /// Identifier.
    Id,
    /// Reserved word (case-insensitive).
    Keyword,
    /// Run of decimal digits.
    Num,
    /// Operator: `+ - * / = < > :` or `<= >= <> :=`.
    Op,
    /// Delimiter: `; , . ( ) [ ]` or `..`.
    Delim,
    /// A single character nothing else accepts.
    Unknown,
}

impl TokenKind {
    /// Spelling used in token records.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::String => "STRING",
            TokenKind::Id => "ID",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Num => "NUM",
            TokenKind::Op => "OP",
            TokenKind::Delim => "DELIM",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexeme and the position of its first character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text. Doubled quotes inside strings are kept as written.
    pub lexeme: String,
    /// 1-based line.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}:{}", self.kind, self.lexeme, self.line, self.column)
    }
}
