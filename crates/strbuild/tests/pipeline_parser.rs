//! Integration tests for the modifier pipeline parser.

use strbuild::{ArgKey, Args, Literal, ModifierCall, Placeholder, parse_pipeline};

fn single(text: &str) -> ModifierCall {
    let mut calls = parse_pipeline(text, "|");
    assert_eq!(calls.len(), 1, "expected one call in {text:?}");
    calls.remove(0)
}

fn string(text: &str) -> Literal {
    Literal::String(text.to_string())
}

fn bare(text: &str) -> Literal {
    Literal::Bare(text.to_string())
}

// =============================================================================
// Stages
// =============================================================================

#[test]
fn names_without_arguments() {
    let calls = parse_pipeline("e|raw|to_debug", "|");
    let names: Vec<&str> = calls.iter().map(|call| call.name.as_str()).collect();
    assert_eq!(names, vec!["e", "raw", "to_debug"]);
    assert!(calls.iter().all(|call| call.args.is_empty()));
}

#[test]
fn repeated_modifiers_are_kept_in_order() {
    let calls = parse_pipeline("e|e", "|");
    assert_eq!(calls, vec![ModifierCall::new("e"), ModifierCall::new("e")]);
}

#[test]
fn separator_inside_string_argument_does_not_split() {
    let call = single("date('H|i')");
    assert_eq!(call.args.positional(0), Some(&string("H|i")));
}

#[test]
fn empty_pipeline_has_no_calls() {
    assert!(parse_pipeline("", "|").is_empty());
    assert!(parse_pipeline(" | ", "|").is_empty());
}

// =============================================================================
// Scalar arguments
// =============================================================================

#[test]
fn positional_scalars() {
    let call = single(r#"f(1, -2, 3.5, -0.25, 'single', "double", true, FALSE, null)"#);
    let values: Vec<&Literal> = call.args.iter().map(|(_, literal)| literal).collect();
    assert_eq!(
        values,
        vec![
            &Literal::Int(1),
            &Literal::Int(-2),
            &Literal::Float(3.5),
            &Literal::Float(-0.25),
            &string("single"),
            &string("double"),
            &Literal::Bool(true),
            &Literal::Bool(false),
            &Literal::Null,
        ]
    );
}

#[test]
fn exponent_numbers_are_floats() {
    let call = single("f(1e3, 2.5E-1)");
    assert_eq!(call.args.positional(0), Some(&Literal::Float(1000.0)));
    assert_eq!(call.args.positional(1), Some(&Literal::Float(0.25)));
}

#[test]
fn string_escapes_follow_quote_style() {
    let call = single(r#"f('it\'s', "tab\there", 'no\nescape')"#);
    assert_eq!(call.args.positional(0), Some(&string("it's")));
    assert_eq!(call.args.positional(1), Some(&string("tab\there")));
    assert_eq!(call.args.positional(2), Some(&string(r"no\nescape")));
}

#[test]
fn bare_word_argument_is_kept_as_text() {
    let call = single("e(js)");
    assert_eq!(call.args.positional(0), Some(&bare("js")));
    assert_eq!(call.args.get("type", 0).and_then(Literal::as_str), Some("js"));
}

#[test]
fn class_path_collapses_into_one_token() {
    let call = single(r"make(\app\Format::class, Other::CONSTANT)");
    assert_eq!(call.args.positional(0), Some(&bare(r"\app\Format::class")));
    assert_eq!(call.args.positional(1), Some(&bare("Other::CONSTANT")));
}

// =============================================================================
// Named arguments
// =============================================================================

#[test]
fn named_arguments_with_colon_or_equals() {
    let call = single("escape(type: js, encoding = 'US-ASCII')");
    assert_eq!(call.args.named("type"), Some(&bare("js")));
    assert_eq!(call.args.named("encoding"), Some(&string("US-ASCII")));
    assert!(call.args.positional(0).is_none());
}

#[test]
fn key_followed_by_scalar_word() {
    let call = single("m(flag true, empty NULL, off FALSE, on: true)");
    assert_eq!(call.args.named("flag"), Some(&Literal::Bool(true)));
    assert_eq!(call.args.named("empty"), Some(&Literal::Null));
    assert_eq!(call.args.named("off"), Some(&Literal::Bool(false)));
    assert_eq!(call.args.named("on"), Some(&Literal::Bool(true)));
    assert_eq!(call.args.len(), 4);
}

#[test]
fn key_followed_by_bare_word() {
    let call = single("m(type js)");
    assert_eq!(call.args.named("type"), Some(&bare("js")));
}

#[test]
fn named_and_positional_arguments_mix() {
    let call = single("f('a', depth: 2, 'b')");
    assert_eq!(call.args.positional(0), Some(&string("a")));
    assert_eq!(call.args.positional(1), Some(&string("b")));
    assert_eq!(call.args.named("depth"), Some(&Literal::Int(2)));
    let keys: Vec<&ArgKey> = call.args.iter().map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        vec![
            &ArgKey::Index(0),
            &ArgKey::Name("depth".to_string()),
            &ArgKey::Index(1),
        ]
    );
}

#[test]
fn named_lookup_falls_back_to_position() {
    let call = single("date('Y')");
    assert_eq!(call.args.get("format", 0), Some(&string("Y")));
    assert_eq!(call.args.get("format", 1), None);
}

#[test]
fn key_without_value_is_dropped() {
    let call = single("f(key:, 'x')");
    assert_eq!(call.args.len(), 1);
    assert_eq!(call.args.positional(0), Some(&string("x")));
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn list_argument() {
    let call = single("f([1, 'two', [3, bare]], tail)");
    assert_eq!(
        call.args.positional(0),
        Some(&Literal::List(vec![
            Literal::Int(1),
            string("two"),
            Literal::List(vec![Literal::Int(3), bare("bare")]),
        ]))
    );
    assert_eq!(call.args.positional(1), Some(&bare("tail")));
}

#[test]
fn named_list_argument() {
    let call = single("f(items: [true, null])");
    assert_eq!(
        call.args.named("items"),
        Some(&Literal::List(vec![Literal::Bool(true), Literal::Null]))
    );
}

// =============================================================================
// Lenient input
// =============================================================================

#[test]
fn unterminated_groups_are_committed() {
    let call = single("f('a', [1, 2");
    assert_eq!(call.args.positional(0), Some(&string("a")));
    assert_eq!(
        call.args.positional(1),
        Some(&Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
    );

    let call = single("f('open");
    assert_eq!(call.args.positional(0), Some(&string("open")));
}

#[test]
fn stray_punctuation_is_ignored() {
    let call = single("f(1 ; 2)");
    assert_eq!(call.args.positional(0), Some(&Literal::Int(2)));
}

#[test]
fn tokens_after_closing_paren_are_ignored() {
    let call = single("f(1) trailing(2)");
    let expected: Args = [Literal::Int(1)].into_iter().collect();
    assert_eq!(call.args, expected);
}

// =============================================================================
// Placeholders
// =============================================================================

#[test]
fn placeholder_splits_names_and_pipeline() {
    let placeholder = Placeholder::parse("title:name|date('H:i')|e", ":", "|");
    assert_eq!(placeholder.names, vec!["title", "name"]);
    assert_eq!(placeholder.pipeline.len(), 2);
    assert_eq!(placeholder.pipeline[0].args.positional(0), Some(&string("H:i")));
}

#[test]
fn placeholder_without_pipeline() {
    let placeholder = Placeholder::parse("name", ":", "|");
    assert_eq!(placeholder.names, vec!["name"]);
    assert!(placeholder.pipeline.is_empty());
}
