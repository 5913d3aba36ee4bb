//! Debug and JavaScript-expression renderings of values.

use std::io::{Result as IoResult, Write};

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};

use crate::builder::Encoding;
use crate::modifiers::escape::js_escape;
use crate::types::Value;

/// Renders a value for debugging.
///
/// Strings are single-quoted, null is `NULL`, floats always carry a
/// fractional part. Lists and maps collapse to `Array` unless `depth` allows
/// expanding them, one level per unit of depth.
///
/// # Example
///
/// ```
/// use strbuild::{Value, to_debug_string};
///
/// let list = Value::from(vec![1, 2]);
/// assert_eq!(to_debug_string(&list, 0), "Array");
/// assert_eq!(to_debug_string(&list, 1), "[0 => 1, 1 => 2]");
/// assert_eq!(to_debug_string(&Value::from(2.0), 0), "2.0");
/// ```
pub fn to_debug_string(value: &Value, depth: i64) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => float_text(*f),
        Value::String(s) => format!("'{s}'"),
        Value::Lazy(_) => "Closure".to_string(),
        Value::List(_) | Value::Map(_) if depth < 1 => "Array".to_string(),
        Value::List(items) => {
            let entries: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(index, item)| format!("{index} => {}", to_debug_string(item, depth - 1)))
                .collect();
            format!("[{}]", entries.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, item)| format!("'{key}' => {}", to_debug_string(item, depth - 1)))
                .collect();
            format!("[{}]", entries.join(", "))
        }
    }
}

/// Renders a value as a JavaScript expression safe to embed in HTML.
///
/// Strings become single-quoted JavaScript-escaped literals; lists and maps
/// become JSON with `<`, `>`, `&`, `'` and `"` written as `\u00XX`
/// escapes.
pub fn to_js_expression(value: &Value, encoding: Encoding) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => float_text(*f),
        Value::String(s) => format!("'{}'", js_escape(s, encoding)),
        Value::Lazy(_) => "{}".to_string(),
        Value::List(_) | Value::Map(_) => to_html_safe_json(value),
    }
}

fn float_text(f: f64) -> String {
    let text = f.to_string();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        format!("{text}.0")
    } else {
        text
    }
}

fn to_html_safe_json(value: &Value) -> String {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, HtmlSafeFormatter);
    if value.serialize(&mut serializer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Compact JSON formatter that hex-escapes HTML-significant characters.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if matches!(c, '<' | '>' | '&' | '\'' | '"') {
                writer.write_all(&fragment.as_bytes()[start..index])?;
                write!(writer, "\\u{:04X}", u32::from(c))?;
                start = index + 1;
            }
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        match char_escape {
            CharEscape::Quote => write!(writer, "\\u{:04X}", u32::from('"')),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn debug_scalars() {
        assert_eq!(to_debug_string(&Value::Null, 0), "NULL");
        assert_eq!(to_debug_string(&Value::from(true), 0), "true");
        assert_eq!(to_debug_string(&Value::from(-3), 0), "-3");
        assert_eq!(to_debug_string(&Value::from(1.5), 0), "1.5");
        assert_eq!(to_debug_string(&Value::from("x"), 0), "'x'");
    }

    #[test]
    fn debug_nested_map_respects_depth() {
        let mut inner = BTreeMap::new();
        inner.insert("b".to_string(), Value::from(vec![1]));
        let mut outer = BTreeMap::new();
        outer.insert("a".to_string(), Value::Map(inner));
        let value = Value::Map(outer);

        assert_eq!(to_debug_string(&value, 1), "['a' => Array]");
        assert_eq!(to_debug_string(&value, 3), "['a' => ['b' => [0 => 1]]]");
    }

    #[test]
    fn js_expression_scalars() {
        assert_eq!(to_js_expression(&Value::Null, Encoding::Utf8), "null");
        assert_eq!(to_js_expression(&Value::from(3.0), Encoding::Utf8), "3.0");
        assert_eq!(
            to_js_expression(&Value::from("a'sd\"f"), Encoding::Utf8),
            r"'a\x27sd\x22f'"
        );
    }

    #[test]
    fn js_expression_collections_are_html_safe_json() {
        assert_eq!(to_js_expression(&Value::List(Vec::new()), Encoding::Utf8), "[]");

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Value::from(1));
        assert_eq!(to_js_expression(&Value::Map(map), Encoding::Utf8), r#"{"a":1}"#);

        let json = to_js_expression(&Value::from(vec!["<b>\"'&"]), Encoding::Utf8);
        assert_eq!(json, r#"["\u003Cb\u003E\u0022\u0027\u0026"]"#);
    }
}
