//! Runtime string building with `{:name|modifier(args)}` placeholders.
//!
//! A [`StringBuilder`] substitutes placeholders in a message with values,
//! an optional [`Converter`], or a configurable substitute, and runs each
//! resolved value through a pipeline of named modifiers. Configuration
//! lives in [`Settings`]; a [`Registry`] holds default settings and a cache
//! of named builders.
//!
//! ```
//! use strbuild::{StringBuilder, values};
//!
//! let builder = StringBuilder::new();
//! let text = builder.build(
//!     "{:greeting}, {:user:guest}! Today is {:today|date('Y-m-d')}.",
//!     &values! { "greeting" => "Hello", "guest" => "visitor", "today" => 86_400 },
//!     None,
//! );
//! assert_eq!(text, "Hello, visitor! Today is 1970-01-02.");
//! ```

pub mod builder;
#[cfg(feature = "global-registry")]
pub mod global;
pub mod modifiers;
pub mod parser;
pub mod types;

pub use builder::{
    BuildLimits, BuilderOptions, ConfigError, Converter, Delimiters, Encoding, Hook, Marker,
    Registry, RegistryError, Resolution, Settings, SettingsError, SettingsFile, StringBuilder,
    TemplateWarning, escape_shell_command, hook, lint_template, resolve, shell_command_hook,
};
pub use modifiers::{
    EscapeType, Modifier, ModifierContext, ModifierFn, ModifierKind, ModifierRegistry, escape, format_date,
    strtotime, to_debug_string, to_js_expression,
};
pub use parser::{ModifierCall, Placeholder, Span, find_next, parse_pipeline};
pub use types::{ArgKey, Args, LazyValue, Literal, Value, Values};

/// Creates a [`Values`] map from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// vectors and options can be passed directly.
///
/// # Example
///
/// ```
/// use strbuild::{Value, values};
///
/// let v = values! { "count" => 3, "name" => "Alice" };
/// assert_eq!(v.len(), 2);
/// assert_eq!(v["count"].as_int(), Some(3));
/// assert_eq!(v["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! values {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
