//! Comment stripping for schema JSON files.
//!
//! Schema files are JSON plus `//` line comments and `/* */` block comments.
//! Strings are matched first so comment markers inside them survive.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Alternation order matters: a string literal is consumed whole before a
// comment can start inside it.
static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|//[^\n]*|/\*(?s:.*?)\*/"#).unwrap()
});

/// Remove comments, keeping line structure intact for error positions.
pub fn strip_comments(input: &str) -> Cow<'_, str> {
    RE_TOKEN.replace_all(input, |caps: &regex::Captures| {
        let token = &caps[0];
        if token.starts_with('"') {
            token.to_string()
        } else {
            // Keep newlines from block comments so line numbers still match.
            token.chars().filter(|&c| c == '\n').collect()
        }
    })
}
