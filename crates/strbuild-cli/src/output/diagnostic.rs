//! Miette diagnostic wrapper for template warnings.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![expect(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use strbuild::TemplateWarning;
use thiserror::Error;

/// A miette-compatible diagnostic for one template warning.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(strbuild::lint), severity(Warning))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    /// `begin_len` is the length of the enclosure begin marker, used to
    /// underline unterminated placeholders.
    pub fn from_warning(template: &str, warning: &TemplateWarning, begin_len: usize) -> Self {
        let (length, help) = match warning {
            TemplateWarning::UnterminatedPlaceholder { .. } => (begin_len, None),
            TemplateWarning::UnknownModifier {
                name, suggestions, ..
            } => (
                name.len(),
                suggestions.first().map(|s| format!("did you mean '{}'?", s)),
            ),
            TemplateWarning::UnclosedDelimiter { .. }
            | TemplateWarning::UnexpectedDelimiter { .. }
            | TemplateWarning::UnterminatedString { .. } => (1, None),
        };

        // Clamp to the template to avoid a miette panic on out-of-bounds spans
        let offset = warning.offset().min(template.len());
        let length = length.min(template.len() - offset);

        TemplateDiagnostic {
            src: NamedSource::new("template", template.to_string()),
            span: (offset, length).into(),
            message: warning.to_string(),
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modifier_spans_its_name() {
        let warning = TemplateWarning::UnknownModifier {
            name: "escpe".to_string(),
            offset: 4,
            suggestions: vec!["escape".to_string()],
        };
        let diagnostic = TemplateDiagnostic::from_warning("{:a|escpe}", &warning, 2);
        assert_eq!(diagnostic.span, SourceSpan::from((4, 5)));
        assert_eq!(diagnostic.help.as_deref(), Some("did you mean 'escape'?"));
    }

    #[test]
    fn span_is_clamped_to_template() {
        let warning = TemplateWarning::UnterminatedPlaceholder { offset: 3 };
        let diagnostic = TemplateDiagnostic::from_warning("ab {", &warning, 2);
        assert_eq!(diagnostic.span, SourceSpan::from((3, 1)));
    }
}
