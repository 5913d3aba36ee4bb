//! Context-specific escaping.

use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::builder::Encoding;

/// Target context of an escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeType {
    #[default]
    Html,
    #[serde(alias = "js")]
    Javascript,
    Css,
    Shell,
}

impl EscapeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EscapeType::Html => "html",
            EscapeType::Javascript => "javascript",
            EscapeType::Css => "css",
            EscapeType::Shell => "shell",
        }
    }
}

impl Display for EscapeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised escape type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown escape type '{0}', expected one of: html, javascript, js, css, shell")]
pub struct UnknownEscapeType(pub String);

impl FromStr for EscapeType {
    type Err = UnknownEscapeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(EscapeType::Html),
            "javascript" | "js" => Ok(EscapeType::Javascript),
            "css" => Ok(EscapeType::Css),
            "shell" => Ok(EscapeType::Shell),
            _ => Err(UnknownEscapeType(s.to_string())),
        }
    }
}

/// Escapes `value` for embedding in the given context.
///
/// With [`Encoding::UsAscii`], characters outside ASCII are also written as
/// escapes where the target context has a syntax for it (HTML character
/// references, JavaScript `\u` sequences).
///
/// # Example
///
/// ```
/// use strbuild::{Encoding, EscapeType, escape};
///
/// assert_eq!(escape("<a href=\"#\">", EscapeType::Html, Encoding::Utf8), "&lt;a href=&quot;#&quot;&gt;");
/// assert_eq!(escape("it's", EscapeType::Shell, Encoding::Utf8), r"'it'\''s'");
/// ```
pub fn escape(value: &str, escape_type: EscapeType, encoding: Encoding) -> String {
    match escape_type {
        EscapeType::Html => html_escape(value, encoding),
        EscapeType::Javascript => js_escape(value, encoding),
        EscapeType::Css => css_escape(value),
        EscapeType::Shell => shell_escape(value),
    }
}

pub fn html_escape(value: &str, encoding: Encoding) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if encoding == Encoding::UsAscii && !c.is_ascii() => {
                let _ = write!(out, "&#x{:X};", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Escapes a string for use inside a JavaScript string literal.
///
/// Every character below U+0100 other than ASCII letters and digits becomes
/// `\xHH`; U+2028 and U+2029 become `\u2028` and `\u2029`.
pub fn js_escape(value: &str, encoding: Encoding) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        let code = u32::from(c);
        if code < 0x100 && !c.is_ascii_alphanumeric() {
            let _ = write!(out, "\\x{code:02x}");
        } else if code == 0x2028 || code == 0x2029 {
            let _ = write!(out, "\\u{code:04x}");
        } else if encoding == Encoding::UsAscii && !c.is_ascii() {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escapes a string for CSS. Numeric strings pass through unchanged.
pub fn css_escape(value: &str) -> String {
    if is_numeric(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if c == '\0' {
            out.push_str("\\00FFFD");
        } else {
            let _ = write!(out, "\\{:06X}", u32::from(c));
        }
    }
    out
}

/// Quotes a string as a single POSIX shell argument.
pub fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Decimal or exponent notation, optionally signed and padded with whitespace.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed.bytes().any(|b| b.is_ascii_digit())
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && trimmed.parse::<f64>().is_ok()
}
