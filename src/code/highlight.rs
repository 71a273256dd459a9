//! Line-oriented Python tokenizer and colour themes.

use crate::style::Color;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    /// `import`, `from`, `as`
    Namespace,
    Builtin,
    /// Name introduced by `def` or `class`
    Function,
    String,
    Number,
    Comment,
    Decorator,
    Operator,
    Punctuation,
    Name,
    Text,
}

/// A token spanning char columns `[start, end)` of one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

const KEYWORDS: &[&str] = &[
    "and", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "global", "if", "in", "is", "lambda", "nonlocal", "not", "or",
    "pass", "raise", "return", "try", "while", "with", "yield", "True", "False", "None",
];

const NAMESPACE_KEYWORDS: &[&str] = &["import", "from", "as"];

const BUILTINS: &[&str] = &[
    "print", "len", "range", "open", "str", "int", "float", "list", "dict", "set", "tuple",
    "enumerate", "zip", "map", "filter", "sorted", "isinstance", "super", "type", "self",
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"(?P<comment>#.*$)"#,
            r#"|(?P<string>[rRbBfFuU]{0,2}(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'))"#,
            r#"|(?P<decorator>@[A-Za-z_][A-Za-z0-9_.]*)"#,
            r#"|(?P<number>\b\d+(?:\.\d+)?\b)"#,
            r#"|(?P<name>[A-Za-z_][A-Za-z0-9_]*)"#,
            r#"|(?P<op>[-+*/%=<>!&|^~]+|\.)"#,
            r#"|(?P<punct>[()\[\]{}:,;])"#,
        ))
        .expect("token regex is valid")
    })
}

/// Tokenize one line of Python. Gaps between tokens (whitespace, stray
/// characters) are reported as [`TokenKind::Text`].
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor_byte = 0;
    let mut cursor_col = 0;
    let mut after_def = false;

    let col_of = |byte: usize| line[..byte].chars().count();

    for caps in token_regex().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor_byte {
            let start = cursor_col;
            let end = col_of(whole.start());
            tokens.push(Token {
                kind: TokenKind::Text,
                start,
                end,
            });
        }

        let text = whole.as_str();
        let kind = if caps.name("comment").is_some() {
            TokenKind::Comment
        } else if caps.name("string").is_some() {
            TokenKind::String
        } else if caps.name("decorator").is_some() {
            TokenKind::Decorator
        } else if caps.name("number").is_some() {
            TokenKind::Number
        } else if caps.name("name").is_some() {
            classify_name(text, after_def)
        } else if caps.name("op").is_some() {
            TokenKind::Operator
        } else {
            TokenKind::Punctuation
        };
        after_def = kind == TokenKind::Keyword && (text == "def" || text == "class");

        let start = col_of(whole.start());
        let end = col_of(whole.end());
        tokens.push(Token { kind, start, end });
        cursor_byte = whole.end();
        cursor_col = end;
    }

    if cursor_byte < line.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            start: cursor_col,
            end: line.chars().count(),
        });
    }

    tokens
}

fn classify_name(text: &str, after_def: bool) -> TokenKind {
    if after_def {
        TokenKind::Function
    } else if NAMESPACE_KEYWORDS.contains(&text) {
        TokenKind::Namespace
    } else if KEYWORDS.contains(&text) {
        TokenKind::Keyword
    } else if BUILTINS.contains(&text) {
        TokenKind::Builtin
    } else {
        TokenKind::Name
    }
}

/// Syntax colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Monokai,
}

impl Theme {
    pub fn background(self) -> Color {
        match self {
            Theme::Monokai => Color::rgb(0x27, 0x28, 0x22),
        }
    }

    pub fn color(self, kind: TokenKind) -> Color {
        match self {
            Theme::Monokai => match kind {
                TokenKind::Keyword => Color::rgb(0x66, 0xD9, 0xEF),
                TokenKind::Namespace | TokenKind::Operator => Color::rgb(0xF9, 0x26, 0x72),
                TokenKind::Function | TokenKind::Decorator => Color::rgb(0xA6, 0xE2, 0x2E),
                TokenKind::String => Color::rgb(0xE6, 0xDB, 0x74),
                TokenKind::Number => Color::rgb(0xAE, 0x81, 0xFF),
                TokenKind::Comment => Color::rgb(0x75, 0x71, 0x5E),
                TokenKind::Builtin
                | TokenKind::Punctuation
                | TokenKind::Name
                | TokenKind::Text => Color::rgb(0xF8, 0xF8, 0xF2),
            },
        }
    }
}
