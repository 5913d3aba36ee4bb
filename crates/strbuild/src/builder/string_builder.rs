//! The user-facing string builder.

use tracing::trace;

use crate::builder::config::Settings;
use crate::builder::context::BuildContext;
use crate::builder::engine::Interpolator;
use crate::builder::registry::Registry;
use crate::builder::resolver::Converter;
use crate::modifiers::ModifierContext;
use crate::parser::ModifierCall;
use crate::types::{Value, Values};

/// Builds messages by substituting placeholders such as `{:name|modifier}`.
///
/// A builder owns its [`Settings`]: stored values, converter, markers,
/// modifiers, escaping and hooks. Values passed to a build call are laid over
/// the stored values for that call only.
///
/// # Example
///
/// ```
/// use strbuild::{StringBuilder, values};
///
/// let mut builder = StringBuilder::new();
/// builder.settings_mut().set_value("site", "example.com");
///
/// let text = builder.build("Welcome to {:site}, {:name|e}!", &values! { "name" => "<Ann>" }, None);
/// assert_eq!(text, "Welcome to example.com, &lt;Ann&gt;!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringBuilder {
    cache_name: Option<String>,
    settings: Settings,
}

impl StringBuilder {
    /// A builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            cache_name: None,
            settings,
        }
    }

    /// A builder seeded from a registry's current defaults. Later changes to
    /// the registry defaults do not affect it.
    pub fn with_defaults(registry: &Registry) -> Self {
        Self::with_settings(registry.defaults().clone())
    }

    pub(crate) fn cached(name: &str, settings: Settings) -> Self {
        Self {
            cache_name: Some(name.to_string()),
            settings,
        }
    }

    /// The registry name this builder is cached under, if any.
    pub fn cache_name(&self) -> Option<&str> {
        self.cache_name.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Builds `message`.
    ///
    /// `values` are merged over the stored values; `converter`, when given,
    /// replaces the stored converter for this call. Pre hooks see the message
    /// before any substitution, post hooks see the final text. Building never
    /// fails: unresolved placeholders follow the substitute policy and
    /// unknown modifiers are skipped.
    pub fn build(&self, message: &str, values: &Values, converter: Option<&dyn Converter>) -> String {
        let mut message = message.to_string();
        for hook in self.settings.pre_hooks() {
            message = hook(message, values, converter, self);
        }

        let converter = converter.or(self.settings.converter());
        let merged = self.settings.merged_values(values);
        let mut context = BuildContext::new(self.settings.limits());
        let mut message =
            Interpolator::new(&self.settings, &merged, converter).interpolate(message, &mut context);
        trace!(exhausted = context.is_exhausted(), "build finished");

        for hook in self.settings.post_hooks() {
            message = hook(message, &merged, converter, self);
        }
        message
    }

    /// Builds the stored message from [`Settings::message`].
    pub fn render(&self, values: &Values, converter: Option<&dyn Converter>) -> String {
        self.build(self.settings.message(), values, converter)
    }

    /// Applies a modifier pipeline to a value with this builder's modifiers,
    /// encoding and escaping.
    ///
    /// ```
    /// use strbuild::{StringBuilder, Value, parse_pipeline};
    ///
    /// let builder = StringBuilder::new();
    /// let pipeline = parse_pipeline("date('Y-m-d')", "|");
    /// assert_eq!(builder.modify(Value::from(0), &pipeline), Value::from("1970-01-01"));
    /// ```
    pub fn modify(&self, value: Value, pipeline: &[ModifierCall]) -> Value {
        let context = ModifierContext {
            encoding: self.settings.encoding(),
        };
        self.settings.modifiers().apply_pipeline(
            value,
            pipeline,
            &context,
            self.settings.implicit_escape(),
        )
    }
}
