//! Builder configuration: markers, encoding, limits and the settings that a
//! [`StringBuilder`](crate::StringBuilder) or a [`Registry`](crate::Registry)
//! carries.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use bon::Builder;
use serde::Deserialize;
use serde_json::{Error as JsonError, Value as JsonValue};

use crate::builder::error::{ConfigError, SettingsError};
use crate::builder::hooks::Hook;
use crate::builder::resolver::Converter;
use crate::modifiers::{EscapeType, ModifierKind, ModifierRegistry};
use crate::types::{Value, Values};

pub const DEFAULT_ENCLOSURE_BEGIN: &str = "{:";
pub const DEFAULT_ENCLOSURE_END: &str = "}";
pub const DEFAULT_NAME_SEPARATOR: &str = ":";
pub const DEFAULT_MODIFIER_SEPARATOR: &str = "|";
pub const DEFAULT_SUBSTITUTE: &str = "";
pub const DEFAULT_MESSAGE: &str = "No message has been specified.";

// =============================================================================
// Markers
// =============================================================================

/// One of the five strings that must stay pairwise distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    EnclosureBegin,
    EnclosureEnd,
    NameSeparator,
    ModifierSeparator,
    Substitute,
}

impl Marker {
    pub const ALL: [Marker; 5] = [
        Marker::EnclosureBegin,
        Marker::EnclosureEnd,
        Marker::NameSeparator,
        Marker::ModifierSeparator,
        Marker::Substitute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::EnclosureBegin => "enclosure begin",
            Marker::EnclosureEnd => "enclosure end",
            Marker::NameSeparator => "name separator",
            Marker::ModifierSeparator => "modifier separator",
            Marker::Substitute => "substitute",
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Placeholder markers and the substitute for unresolved placeholders.
///
/// Every setter validates that the four markers and the substitute stay
/// pairwise distinct and that no marker is empty. A rejected change leaves
/// the delimiters untouched.
///
/// # Example
///
/// ```
/// use strbuild::{ConfigError, Delimiters, Marker};
///
/// let mut delimiters = Delimiters::default();
/// delimiters.set_enclosure("[[", "]]").unwrap();
///
/// let err = delimiters.set_name_separator("]]").unwrap_err();
/// assert!(matches!(
///     err,
///     ConfigError::ConfigurationConflict { field: Marker::NameSeparator, other: Marker::EnclosureEnd, .. }
/// ));
/// assert_eq!(delimiters.name_separator(), ":");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    enclosure_begin: String,
    enclosure_end: String,
    name_separator: String,
    modifier_separator: String,
    /// `None` echoes the unresolved placeholder back verbatim.
    substitute: Option<String>,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            enclosure_begin: DEFAULT_ENCLOSURE_BEGIN.to_string(),
            enclosure_end: DEFAULT_ENCLOSURE_END.to_string(),
            name_separator: DEFAULT_NAME_SEPARATOR.to_string(),
            modifier_separator: DEFAULT_MODIFIER_SEPARATOR.to_string(),
            substitute: Some(DEFAULT_SUBSTITUTE.to_string()),
        }
    }
}

impl Delimiters {
    /// Creates delimiters, validating all of them together.
    pub fn new(
        enclosure_begin: impl Into<String>,
        enclosure_end: impl Into<String>,
        name_separator: impl Into<String>,
        modifier_separator: impl Into<String>,
        substitute: Option<String>,
    ) -> Result<Self, ConfigError> {
        let delimiters = Self {
            enclosure_begin: enclosure_begin.into(),
            enclosure_end: enclosure_end.into(),
            name_separator: name_separator.into(),
            modifier_separator: modifier_separator.into(),
            substitute,
        };
        delimiters.validate()?;
        Ok(delimiters)
    }

    pub fn enclosure_begin(&self) -> &str {
        &self.enclosure_begin
    }

    pub fn enclosure_end(&self) -> &str {
        &self.enclosure_end
    }

    pub fn name_separator(&self) -> &str {
        &self.name_separator
    }

    pub fn modifier_separator(&self) -> &str {
        &self.modifier_separator
    }

    /// The replacement for unresolved placeholders, or `None` when they are
    /// echoed back.
    pub fn substitute(&self) -> Option<&str> {
        self.substitute.as_deref()
    }

    /// Current value of `marker`.
    pub fn get(&self, marker: Marker) -> Option<&str> {
        match marker {
            Marker::EnclosureBegin => Some(&self.enclosure_begin),
            Marker::EnclosureEnd => Some(&self.enclosure_end),
            Marker::NameSeparator => Some(&self.name_separator),
            Marker::ModifierSeparator => Some(&self.modifier_separator),
            Marker::Substitute => self.substitute.as_deref(),
        }
    }

    pub fn set_enclosure_begin(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.try_update(&[Marker::EnclosureBegin], |next| next.enclosure_begin = value)
    }

    pub fn set_enclosure_end(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.try_update(&[Marker::EnclosureEnd], |next| next.enclosure_end = value)
    }

    /// Sets both enclosure markers at once.
    pub fn set_enclosure(
        &mut self,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let (begin, end) = (begin.into(), end.into());
        self.try_update(&[Marker::EnclosureBegin, Marker::EnclosureEnd], |next| {
            next.enclosure_begin = begin;
            next.enclosure_end = end;
        })
    }

    pub fn set_name_separator(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.try_update(&[Marker::NameSeparator], |next| next.name_separator = value)
    }

    pub fn set_modifier_separator(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.try_update(&[Marker::ModifierSeparator], |next| {
            next.modifier_separator = value;
        })
    }

    /// Replaces unresolved placeholders with `value`.
    pub fn set_substitute(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        self.try_update(&[Marker::Substitute], |next| next.substitute = Some(value))
    }

    /// Leaves unresolved placeholders in the output as written.
    pub fn echo_unresolved(&mut self) {
        self.substitute = None;
    }

    /// Checks every marker against every other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check(&Marker::ALL)
    }

    fn try_update(
        &mut self,
        changed: &[Marker],
        update: impl FnOnce(&mut Self),
    ) -> Result<(), ConfigError> {
        let mut next = self.clone();
        update(&mut next);
        next.check(changed)?;
        *self = next;
        Ok(())
    }

    fn check(&self, changed: &[Marker]) -> Result<(), ConfigError> {
        for &field in changed {
            let Some(value) = self.get(field) else {
                continue;
            };
            if field != Marker::Substitute && value.is_empty() {
                return Err(ConfigError::EmptyMarker { field });
            }
            for other in Marker::ALL {
                if other != field && self.get(other) == Some(value) {
                    return Err(ConfigError::ConfigurationConflict {
                        field,
                        other,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Text encoding passed to modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    UsAscii,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::UsAscii => "US-ASCII",
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    /// Parses an encoding name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            "US-ASCII" | "ASCII" => Ok(Encoding::UsAscii),
            _ => Err(ConfigError::UnknownEncoding {
                encoding: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Limits and construction options
// =============================================================================

/// Bounds on a single build call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct BuildLimits {
    /// Maximum nesting of recursive interpolation.
    #[builder(default = 64)]
    max_depth: usize,
    /// Maximum number of placeholder substitutions across one build.
    #[builder(default = 10_000)]
    max_substitutions: usize,
}

impl Default for BuildLimits {
    fn default() -> Self {
        BuildLimits::builder().build()
    }
}

impl BuildLimits {
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_substitutions(&self) -> usize {
        self.max_substitutions
    }
}

/// Optional overrides applied when a builder is created from defaults.
///
/// # Example
///
/// ```
/// use strbuild::{BuilderOptions, Encoding, Registry, values};
///
/// let mut registry = Registry::new_default();
/// let options = BuilderOptions::builder()
///     .values(values! { "site" => "example.com" })
///     .encoding(Encoding::UsAscii)
///     .build();
/// let builder = registry.factory_with("mail", options);
/// assert_eq!(builder.settings().encoding(), Encoding::UsAscii);
/// ```
#[derive(Default, Builder)]
pub struct BuilderOptions {
    /// Replaces the default values.
    values: Option<Values>,
    converter: Option<Arc<dyn Converter>>,
    /// Replaces the default modifier registry.
    modifiers: Option<ModifierRegistry>,
    encoding: Option<Encoding>,
}

impl BuilderOptions {
    pub(crate) fn apply_to(self, settings: &mut Settings) {
        if let Some(values) = self.values {
            settings.values = values;
        }
        if let Some(converter) = self.converter {
            settings.converter = Some(converter);
        }
        if let Some(modifiers) = self.modifiers {
            settings.modifiers = modifiers;
        }
        if let Some(encoding) = self.encoding {
            settings.encoding = encoding;
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// The full configuration of a builder.
///
/// The same type holds the registry-wide defaults and the configuration of
/// each builder, so both scopes enforce the same invariants.
#[derive(Clone)]
pub struct Settings {
    delimiters: Delimiters,
    encoding: Encoding,
    values: Values,
    converter: Option<Arc<dyn Converter>>,
    modifiers: ModifierRegistry,
    auto_escape: bool,
    escape_type: EscapeType,
    message: String,
    pre_hooks: Vec<Hook>,
    post_hooks: Vec<Hook>,
    limits: BuildLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            encoding: Encoding::default(),
            values: Values::new(),
            converter: None,
            modifiers: ModifierRegistry::with_builtins(),
            auto_escape: false,
            escape_type: EscapeType::Html,
            message: DEFAULT_MESSAGE.to_string(),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            limits: BuildLimits::default(),
        }
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Settings")
            .field("delimiters", &self.delimiters)
            .field("encoding", &self.encoding)
            .field("values", &self.values.len())
            .field("converter", &self.converter.is_some())
            .field("modifiers", &self.modifiers.names())
            .field("auto_escape", &self.auto_escape)
            .field("escape_type", &self.escape_type)
            .field("message", &self.message)
            .field("pre_hooks", &self.pre_hooks.len())
            .field("post_hooks", &self.post_hooks.len())
            .field("limits", &self.limits)
            .finish()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Delimiters and encoding
    // -------------------------------------------------------------------------

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Mutable access to the markers. Their setters validate each change.
    pub fn delimiters_mut(&mut self) -> &mut Delimiters {
        &mut self.delimiters
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Sets the encoding by name, rejecting unsupported encodings.
    pub fn set_encoding(&mut self, name: &str) -> Result<(), ConfigError> {
        self.encoding = name.parse()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Values and converter
    // -------------------------------------------------------------------------

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }

    /// Replaces all values.
    pub fn set_values(&mut self, values: Values) {
        self.values = values;
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove_value(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// The stored values overlaid with `overrides`; overrides win.
    pub fn merged_values(&self, overrides: &Values) -> Values {
        let mut merged = self.values.clone();
        merged.extend(
            overrides
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        merged
    }

    pub fn converter(&self) -> Option<&dyn Converter> {
        self.converter.as_deref()
    }

    pub fn set_converter(&mut self, converter: impl Converter + 'static) {
        self.converter = Some(Arc::new(converter));
    }

    pub fn clear_converter(&mut self) {
        self.converter = None;
    }

    // -------------------------------------------------------------------------
    // Modifiers and escaping
    // -------------------------------------------------------------------------

    pub fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut ModifierRegistry {
        &mut self.modifiers
    }

    pub fn set_modifiers(&mut self, modifiers: ModifierRegistry) {
        self.modifiers = modifiers;
    }

    pub fn set_modifier(&mut self, name: impl Into<String>, kind: ModifierKind) {
        self.modifiers.insert(name, kind);
    }

    pub fn remove_modifier(&mut self, name: &str) -> Option<ModifierKind> {
        self.modifiers.remove(name)
    }

    pub fn auto_escape(&self) -> bool {
        self.auto_escape
    }

    /// Escapes each value that goes through a modifier pipeline, unless the
    /// pipeline contains `raw`. Placeholders without modifiers are left as is.
    pub fn set_auto_escape(&mut self, enabled: bool) {
        self.auto_escape = enabled;
    }

    pub fn escape_type(&self) -> EscapeType {
        self.escape_type
    }

    pub fn set_escape_type(&mut self, escape_type: EscapeType) {
        self.escape_type = escape_type;
    }

    /// The escape applied after each pipeline, if automatic escaping is on.
    pub fn implicit_escape(&self) -> Option<EscapeType> {
        self.auto_escape.then_some(self.escape_type)
    }

    // -------------------------------------------------------------------------
    // Message, hooks and limits
    // -------------------------------------------------------------------------

    /// Template used by [`StringBuilder::render`](crate::StringBuilder::render).
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn pre_hooks(&self) -> &[Hook] {
        &self.pre_hooks
    }

    pub fn post_hooks(&self) -> &[Hook] {
        &self.post_hooks
    }

    pub fn add_pre_hook(&mut self, hook: Hook) {
        self.pre_hooks.push(hook);
    }

    pub fn add_post_hook(&mut self, hook: Hook) {
        self.post_hooks.push(hook);
    }

    pub fn set_pre_hooks(&mut self, hooks: Vec<Hook>) {
        self.pre_hooks = hooks;
    }

    pub fn set_post_hooks(&mut self, hooks: Vec<Hook>) {
        self.post_hooks = hooks;
    }

    pub fn limits(&self) -> BuildLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: BuildLimits) {
        self.limits = limits;
    }
}

// =============================================================================
// Settings files
// =============================================================================

/// Settings loaded from a JSON document.
///
/// Every field is optional; absent fields leave the target settings as they
/// are.
///
/// ```json
/// {
///   "enclosure_begin": "[[",
///   "enclosure_end": "]]",
///   "echo_unresolved": true,
///   "auto_escape": true,
///   "escape_type": "js",
///   "values": { "site": "example.com" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub enclosure_begin: Option<String>,
    pub enclosure_end: Option<String>,
    pub name_separator: Option<String>,
    pub modifier_separator: Option<String>,
    pub substitute: Option<String>,
    /// When `true`, unresolved placeholders are echoed back. Takes
    /// precedence over `substitute`.
    pub echo_unresolved: Option<bool>,
    pub encoding: Option<String>,
    pub auto_escape: Option<bool>,
    pub escape_type: Option<EscapeType>,
    pub message: Option<String>,
    pub max_depth: Option<usize>,
    pub max_substitutions: Option<usize>,
    pub values: BTreeMap<String, JsonValue>,
}

impl SettingsFile {
    /// Reads and parses a settings file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, JsonError> {
        serde_json::from_str(json)
    }

    /// Applies these settings. Either every field is applied or, on error,
    /// none is.
    pub fn apply(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        let mut delimiters = settings.delimiters.clone();
        if let Some(begin) = &self.enclosure_begin {
            begin.clone_into(&mut delimiters.enclosure_begin);
        }
        if let Some(end) = &self.enclosure_end {
            end.clone_into(&mut delimiters.enclosure_end);
        }
        if let Some(separator) = &self.name_separator {
            separator.clone_into(&mut delimiters.name_separator);
        }
        if let Some(separator) = &self.modifier_separator {
            separator.clone_into(&mut delimiters.modifier_separator);
        }
        if let Some(substitute) = &self.substitute {
            delimiters.substitute = Some(substitute.clone());
        }
        if self.echo_unresolved == Some(true) {
            delimiters.substitute = None;
        }
        delimiters.validate()?;

        let encoding = match &self.encoding {
            Some(name) => name.parse()?,
            None => settings.encoding,
        };

        let current = settings.limits;
        let limits = BuildLimits::builder()
            .max_depth(self.max_depth.unwrap_or(current.max_depth))
            .max_substitutions(self.max_substitutions.unwrap_or(current.max_substitutions))
            .build();

        settings.delimiters = delimiters;
        settings.encoding = encoding;
        settings.limits = limits;
        if let Some(auto_escape) = self.auto_escape {
            settings.auto_escape = auto_escape;
        }
        if let Some(escape_type) = self.escape_type {
            settings.escape_type = escape_type;
        }
        if let Some(message) = &self.message {
            message.clone_into(&mut settings.message);
        }
        for (name, value) in &self.values {
            settings
                .values
                .insert(name.clone(), Value::from(value.clone()));
        }
        Ok(())
    }
}
