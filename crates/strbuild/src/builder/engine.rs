//! The interpolation loop.
//!
//! A message is scanned for its rightmost placeholder, the placeholder is
//! replaced in place, and the scan repeats until no placeholder is left.
//! When a replacement still contains the span it replaced, or computing it
//! ran into the cycle or depth guard, no progress is possible there:
//! everything from that span to the end of the message is frozen and later
//! scans only look to its left.

use tracing::{debug, trace};

use crate::builder::config::Settings;
use crate::builder::context::BuildContext;
use crate::builder::resolver::{Converter, Resolution, resolve};
use crate::modifiers::ModifierContext;
use crate::parser::{Placeholder, contains_placeholder, find_next};
use crate::types::{Value, Values};

/// Interpolates messages against one set of merged values.
pub(crate) struct Interpolator<'a> {
    settings: &'a Settings,
    values: &'a Values,
    converter: Option<&'a dyn Converter>,
}

impl<'a> Interpolator<'a> {
    pub(crate) fn new(
        settings: &'a Settings,
        values: &'a Values,
        converter: Option<&'a dyn Converter>,
    ) -> Self {
        Self {
            settings,
            values,
            converter,
        }
    }

    /// Interpolates `text`, returning it unchanged when the context refuses
    /// to enter it (cycle or depth limit).
    pub(crate) fn interpolate(&self, text: String, context: &mut BuildContext) -> String {
        if !context.enter(&text) {
            return text;
        }
        let result = self.scan(text, context);
        context.leave();
        result
    }

    fn scan(&self, mut message: String, context: &mut BuildContext) -> String {
        let delimiters = self.settings.delimiters();
        let begin = delimiters.enclosure_begin();
        let end = delimiters.enclosure_end();
        let mut frozen = 0;

        while let Some(span) = find_next(&message, Some(message.len() - frozen), begin, end) {
            if !context.consume_substitution() {
                break;
            }
            let refusals = context.refusals();
            let raw = span.raw(&message).to_string();
            let inner = span.inner(&message);
            let replacement = if inner.contains(begin) {
                let name = self.interpolate(inner.to_string(), context);
                format!("{begin}{name}{end}")
            } else {
                let placeholder = Placeholder::parse(
                    inner,
                    delimiters.name_separator(),
                    delimiters.modifier_separator(),
                );
                self.replacement(&placeholder, &raw, context)
            };

            let stalled = context.refusals() > refusals || replacement.contains(raw.as_str());
            let tail = message.len() - span.end;
            message.replace_range(span.start..span.end, &replacement);
            frozen = if stalled {
                debug!(placeholder = %raw, "no progress; freezing placeholder");
                message.len() - span.start
            } else {
                // A span may reach into the frozen tail through its end marker.
                frozen.min(tail)
            };
        }
        message
    }

    /// Computes the text that replaces one placeholder.
    fn replacement(&self, placeholder: &Placeholder, raw: &str, context: &mut BuildContext) -> String {
        let value = match resolve(&placeholder.names, self.values, self.converter, raw) {
            Resolution::Found { value, .. } => value,
            Resolution::NotFound => match self.settings.delimiters().substitute() {
                Some(substitute) => Value::String(substitute.to_string()),
                None => {
                    trace!(placeholder = raw, "unresolved; echoed");
                    return raw.to_string();
                }
            },
        };
        let mut value = self.expand_nested(value, context);
        // Auto-escape rides on the pipeline; a bare `{:name}` is never modified.
        if !placeholder.pipeline.is_empty() {
            let modifier_context = ModifierContext {
                encoding: self.settings.encoding(),
            };
            value = self.settings.modifiers().apply_pipeline(
                value,
                &placeholder.pipeline,
                &modifier_context,
                self.settings.implicit_escape(),
            );
        }
        let text = value.to_string();
        trace!(placeholder = raw, replacement = %text, "substituted");
        text
    }

    /// Interpolates a string value that itself holds a placeholder.
    fn expand_nested(&self, value: Value, context: &mut BuildContext) -> Value {
        let delimiters = self.settings.delimiters();
        match value {
            Value::String(text)
                if contains_placeholder(&text, delimiters.enclosure_begin(), delimiters.enclosure_end()) =>
            {
                Value::String(self.interpolate(text, context))
            }
            other => other,
        }
    }
}
