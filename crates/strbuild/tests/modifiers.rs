//! Integration tests for built-in and registered modifiers.

use std::collections::BTreeMap;
use std::sync::Arc;

use insta::assert_snapshot;
use strbuild::{
    Args, Literal, Modifier, ModifierContext, ModifierFn, ModifierKind, StringBuilder, Value, Values,
    parse_pipeline, values,
};

/// 2024-02-29 13:05:09 UTC.
const LEAP_DAY: i64 = 1_709_211_909;

fn build(message: &str, values: &Values) -> String {
    StringBuilder::new().build(message, values, None)
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn escape_quote_as_html() {
    assert_eq!(build("{:0|e}", &values! { "0" => "\"" }), "&quot;");
    assert_eq!(build("{:0|escape}", &values! { "0" => "\"" }), "&quot;");
}

#[test]
fn escape_types_by_position_and_name() {
    let values = values! { "a" => "x'y" };
    assert_eq!(build("{:a|e('js')}", &values), r"x\x27y");
    assert_eq!(build("{:a|e(type: shell)}", &values), r"'x'\''y'");
    assert_eq!(build("{:a|escape(css)}", &values), r"x\000027y");
}

#[test]
fn unknown_escape_type_leaves_value() {
    assert_eq!(build("{:a|e('xml')}", &values! { "a" => "<b>" }), "<b>");
}

#[test]
fn escape_encoding_argument() {
    let values = values! { "a" => "caf\u{e9}" };
    assert_eq!(build("{:a|e('html', 'US-ASCII')}", &values), "caf&#xE9;");
    assert_eq!(build("{:a|e(encoding: ascii)}", &values), "caf&#xE9;");
}

// =============================================================================
// Dates
// =============================================================================

#[test]
fn date_formats_timestamps() {
    let values = values! { "ts" => LEAP_DAY };
    assert_eq!(build("{:ts|date}", &values), "2024/02/29 13:05:09");
    assert_eq!(build("{:ts|date('Y-m-d H:i')}", &values), "2024-02-29 13:05");
    assert_eq!(build("{:ts|date(format: 'D, j M')}", &values), "Thu, 29 Feb");
}

#[test]
fn strtotime_feeds_date() {
    let values = values! { "when" => "+1 day" };
    assert_eq!(build("{:when|strtotime(0)|date('Y-m-d')}", &values), "1970-01-02");
    assert_eq!(
        build("{:when|strtotime(baseTimestamp: 86400)|date('Y-m-d')}", &values),
        "1970-01-03"
    );
}

#[test]
fn unparseable_date_becomes_empty() {
    assert_eq!(build("[{:when|strtotime(0)}]", &values! { "when" => "someday" }), "[]");
}

// =============================================================================
// Debug and JavaScript renderings
// =============================================================================

#[test]
fn to_debug_renders_collections() {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::from("Ann"));
    map.insert("tags".to_string(), Value::from(vec!["a", "b"]));
    map.insert("score".to_string(), Value::from(2.0));
    let values = values! { "v" => Value::Map(map) };

    assert_snapshot!(build("{:v|to_debug}", &values), @"Array");
    assert_snapshot!(
        build("{:v|to_debug(1)}", &values),
        @"['name' => 'Ann', 'score' => 2.0, 'tags' => Array]"
    );
    assert_snapshot!(
        build("{:v|to_debug_string(depth: 2)}", &values),
        @"['name' => 'Ann', 'score' => 2.0, 'tags' => [0 => 'a', 1 => 'b']]"
    );
}

#[test]
fn to_debug_aliases() {
    let values = values! { "n" => Value::Null, "s" => "x" };
    assert_eq!(build("{:n|to_debug_str} {:s|to_debug}", &values), "NULL 'x'");
}

#[test]
fn js_expr_renders_values() {
    let values = values! {
        "s" => "it's",
        "n" => 3,
        "f" => 1.0,
        "l" => vec![Value::from(1), Value::from("<a>")],
    };
    assert_snapshot!(build("{:s|js_expr}", &values), @r"'it\x27s'");
    assert_snapshot!(build("{:n|js_expr} {:f|js_expr}", &values), @"3 1.0");
    assert_snapshot!(build("{:l|js_expr}", &values), @r#"[1,"\u003Ca\u003E"]"#);
}

// =============================================================================
// Registered modifiers
// =============================================================================

#[test]
fn closure_modifier_with_arguments() {
    let mut builder = StringBuilder::new();
    builder
        .settings_mut()
        .modifiers_mut()
        .insert_fn("repeat", |value, args, _context| {
            let times = args.get("times", 0).and_then(Literal::as_int).unwrap_or(1);
            Value::String(value.to_string().repeat(usize::try_from(times).unwrap_or(0)))
        });
    let values = values! { "a" => "ab" };
    assert_eq!(builder.build("{:a|repeat(3)}", &values, None), "ababab");
    assert_eq!(builder.build("{:a|repeat(times: 2)}", &values, None), "abab");
    assert_eq!(builder.build("{:a|repeat}", &values, None), "ab");
}

struct Wrap {
    left: &'static str,
    right: &'static str,
}

impl Modifier for Wrap {
    fn apply(&self, value: Value, args: &Args, _context: &ModifierContext) -> Value {
        let left = args.get("left", 0).and_then(Literal::as_str).unwrap_or(self.left);
        Value::String(format!("{left}{value}{}", self.right))
    }
}

#[test]
fn instance_modifier() {
    let mut builder = StringBuilder::new();
    builder.settings_mut().modifiers_mut().insert_instance(
        "wrap",
        Wrap {
            left: "[",
            right: "]",
        },
    );
    let values = values! { "a" => "x" };
    assert_eq!(builder.build("{:a|wrap}", &values, None), "[x]");
    assert_eq!(builder.build("{:a|wrap('(')}", &values, None), "(x]");
}

#[test]
fn modifiers_apply_in_order() {
    let mut builder = StringBuilder::new();
    let upper: Arc<ModifierFn> = Arc::new(|value: Value, _: &Args, _: &ModifierContext| {
        Value::String(value.to_string().to_uppercase())
    });
    builder
        .settings_mut()
        .set_modifier("upper", ModifierKind::Closure(upper));
    let values = values! { "a" => "<b>" };
    assert_eq!(builder.build("{:a|upper|e}", &values, None), "&lt;B&gt;");
    assert_eq!(builder.build("{:a|e|upper}", &values, None), "&LT;B&GT;");
}

#[test]
fn unknown_modifier_is_skipped() {
    assert_eq!(build("{:a|nope(1, 2)|e}", &values! { "a" => "&" }), "&amp;");
}

#[test]
fn modifier_receives_encoding() {
    let mut builder = StringBuilder::new();
    builder
        .settings_mut()
        .modifiers_mut()
        .insert_fn("encoding", |_, _, context| Value::from(context.encoding.to_string()));
    assert_eq!(builder.build("{:a|encoding}", &values! { "a" => 1 }, None), "UTF-8");

    builder.settings_mut().set_encoding("ascii").unwrap();
    assert_eq!(builder.build("{:a|encoding}", &values! { "a" => 1 }, None), "US-ASCII");
}

#[test]
fn removed_modifier_is_skipped() {
    let mut builder = StringBuilder::new();
    assert!(builder.settings_mut().remove_modifier("e").is_some());
    assert_eq!(builder.build("{:a|e}", &values! { "a" => "<" }, None), "<");
    assert_eq!(builder.build("{:a|escape}", &values! { "a" => "<" }, None), "&lt;");
}

#[test]
fn modify_applies_pipeline_directly() {
    let builder = StringBuilder::new();
    let pipeline = parse_pipeline("to_debug(1)", "|");
    assert_eq!(
        builder.modify(Value::from(vec![true]), &pipeline),
        Value::from("[0 => true]")
    );
}

#[test]
fn pipeline_json_shape() {
    let calls = parse_pipeline("date('Y-m-d')|e(type: js, [1, null])", "|");
    assert_snapshot!(
        serde_json::to_string(&calls).unwrap(),
        @r#"[{"name":"date","args":[[0,{"type":"string","value":"Y-m-d"}]]},{"name":"e","args":[["type",{"type":"bare","value":"js"}],[0,{"type":"list","value":[{"type":"int","value":1},{"type":"null"}]}]]}]"#
    );
}
