//! Reserved words.
//!
//! One case-insensitive table covering the core Pascal subset plus the
//! type, literal and I/O words of the extended dialect.
//!
//! Lookup lowers the text once and uses its length as a first-pass filter
//! (reserved words are 2-9 characters), then matches the words of that
//! length.

/// Whether `text` is a reserved word, ignoring ASCII case.
pub fn is_keyword(text: &str) -> bool {
    if !(2..=9).contains(&text.len()) {
        return false;
    }
    let lower = text.to_ascii_lowercase();

    match lower.len() {
        2 => matches!(lower.as_str(), "do" | "if" | "of" | "or" | "to"),
        3 => matches!(
            lower.as_str(),
            "and" | "div" | "end" | "for" | "mod" | "not" | "var"
        ),
        4 => matches!(
            lower.as_str(),
            "char" | "else" | "read" | "real" | "then" | "true" | "type"
        ),
        5 => matches!(
            lower.as_str(),
            "array" | "begin" | "const" | "false" | "until" | "while" | "write"
        ),
        6 => matches!(
            lower.as_str(),
            "downto" | "readln" | "repeat" | "return" | "string"
        ),
        7 => matches!(lower.as_str(), "boolean" | "integer" | "program" | "writeln"),
        8 => lower == "function",
        9 => lower == "procedure",
        _ => false,
    }
}

/// Every reserved word, lowercase.
pub const KEYWORDS: &[&str] = &[
    "program",
    "var",
    "begin",
    "end",
    "function",
    "procedure",
    "array",
    "of",
    "integer",
    "real",
    "if",
    "then",
    "else",
    "while",
    "do",
    "return",
    "const",
    "div",
    "mod",
    "and",
    "or",
    "not",
    "for",
    "to",
    "downto",
    "boolean",
    "char",
    "string",
    "true",
    "false",
    "repeat",
    "until",
    "type",
    "read",
    "write",
    "readln",
    "writeln",
];
