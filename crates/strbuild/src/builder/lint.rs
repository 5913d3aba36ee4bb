//! Static checks for templates.
//!
//! Building is lenient and never reports problems. These checks find what
//! building would silently absorb: placeholders that never close, modifier
//! names nothing is registered under, and malformed modifier arguments.

use serde::Serialize;
use strsim::levenshtein;
use thiserror::Error;

use crate::builder::config::Settings;
use crate::parser::lexer::{Token, tokenize};
use crate::parser::split_stages;

/// A problem found in a template. Offsets are byte offsets into the template.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateWarning {
    /// A begin marker with no end marker after it.
    #[error("placeholder at offset {offset} is never closed")]
    UnterminatedPlaceholder { offset: usize },

    #[error("unknown modifier '{name}' at offset {offset}{}", format_suggestions(.suggestions))]
    UnknownModifier {
        name: String,
        offset: usize,
        suggestions: Vec<String>,
    },

    /// An opening parenthesis or bracket that is never closed.
    #[error("'{delimiter}' at offset {offset} is never closed")]
    UnclosedDelimiter { delimiter: char, offset: usize },

    /// A closing parenthesis or bracket with no matching opener.
    #[error("unexpected '{delimiter}' at offset {offset}")]
    UnexpectedDelimiter { delimiter: char, offset: usize },

    #[error("string literal at offset {offset} is never closed")]
    UnterminatedString { offset: usize },
}

impl TemplateWarning {
    /// Byte offset of the problem in the template.
    pub fn offset(&self) -> usize {
        match self {
            TemplateWarning::UnterminatedPlaceholder { offset }
            | TemplateWarning::UnknownModifier { offset, .. }
            | TemplateWarning::UnclosedDelimiter { offset, .. }
            | TemplateWarning::UnexpectedDelimiter { offset, .. }
            | TemplateWarning::UnterminatedString { offset } => *offset,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    match suggestions.first() {
        Some(first) => format!("; did you mean '{first}'?"),
        None => String::new(),
    }
}

/// Checks `template` against the markers and modifiers in `settings`.
///
/// Warnings are returned in template order. Placeholders whose text contains
/// another begin marker are only known at build time; their pipelines are not
/// checked, but the placeholders nested inside them are.
///
/// # Example
///
/// ```
/// use strbuild::{Settings, TemplateWarning, lint_template};
///
/// let warnings = lint_template("Hi {:name|escpe}", &Settings::new());
/// assert_eq!(
///     warnings,
///     vec![TemplateWarning::UnknownModifier {
///         name: "escpe".to_string(),
///         offset: 10,
///         suggestions: vec!["escape".to_string()],
///     }]
/// );
/// ```
pub fn lint_template(template: &str, settings: &Settings) -> Vec<TemplateWarning> {
    let delimiters = settings.delimiters();
    let begin = delimiters.enclosure_begin();
    let end = delimiters.enclosure_end();
    let mut warnings = Vec::new();
    if begin.is_empty() || end.is_empty() {
        return warnings;
    }

    let mut cursor = 0;
    while let Some(found) = template[cursor..].find(begin) {
        let start = cursor + found;
        let inner_start = start + begin.len();
        let Some(length) = template[inner_start..].find(end) else {
            warnings.push(TemplateWarning::UnterminatedPlaceholder { offset: start });
            cursor = inner_start;
            continue;
        };
        let inner = &template[inner_start..inner_start + length];
        if inner.contains(begin) {
            cursor = inner_start;
            continue;
        }
        lint_placeholder(inner, inner_start, settings, &mut warnings);
        cursor = inner_start + length + end.len();
    }
    warnings
}

/// Checks the pipeline of one placeholder. `base` is the offset of `inner`.
fn lint_placeholder(inner: &str, base: usize, settings: &Settings, warnings: &mut Vec<TemplateWarning>) {
    let separator = settings.delimiters().modifier_separator();
    let Some((name, pipeline)) = inner.split_once(separator) else {
        return;
    };
    let pipeline_offset = base + name.len() + separator.len();
    for stage in split_stages(pipeline, separator) {
        lint_stage(stage.text, pipeline_offset + stage.offset, settings, warnings);
    }
}

fn lint_stage(text: &str, base: usize, settings: &Settings, warnings: &mut Vec<TemplateWarning>) {
    let mut named = false;
    let mut open: Vec<(char, usize)> = Vec::new();

    for spanned in tokenize(text) {
        let offset = base + spanned.offset;
        match spanned.token {
            Token::Ident(name) if !named => {
                named = true;
                if !settings.modifiers().contains(name) {
                    let available = settings.modifiers().names();
                    warnings.push(TemplateWarning::UnknownModifier {
                        name: name.to_string(),
                        offset,
                        suggestions: compute_suggestions(name, &available),
                    });
                }
            }
            Token::Punct(delimiter @ ('(' | '[')) => open.push((delimiter, offset)),
            Token::Punct(delimiter @ (')' | ']')) => {
                let expected = if delimiter == ')' { '(' } else { '[' };
                match open.last() {
                    Some((opener, _)) if *opener == expected => {
                        open.pop();
                    }
                    _ => warnings.push(TemplateWarning::UnexpectedDelimiter { delimiter, offset }),
                }
            }
            Token::UnterminatedStr(_) => warnings.push(TemplateWarning::UnterminatedString { offset }),
            _ => {}
        }
    }

    warnings.extend(
        open.into_iter()
            .map(|(delimiter, offset)| TemplateWarning::UnclosedDelimiter { delimiter, offset }),
    );
}

/// Registered names within a small edit distance of `name`, closest first.
pub fn compute_suggestions(name: &str, available: &[&str]) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .iter()
        .filter_map(|candidate| {
            let distance = levenshtein(name, candidate);
            (distance > 0 && distance <= max_distance).then(|| (distance, (*candidate).to_string()))
        })
        .collect();
    suggestions.sort_by_key(|(distance, _)| *distance);
    suggestions.into_iter().take(3).map(|(_, name)| name).collect()
}
