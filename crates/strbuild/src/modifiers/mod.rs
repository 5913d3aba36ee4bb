//! Modifiers: named transforms applied to resolved values.
//!
//! A modifier receives the value, the literal arguments written in the
//! template, and a [`ModifierContext`]. The registry maps names to one of
//! three kinds of implementation, decided once at registration: a built-in,
//! a closure, or a [`Modifier`] trait object.

mod datetime;
mod debug_string;
mod escape;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::debug;

pub use datetime::{DEFAULT_DATE_FORMAT, format_date, strtotime};
pub use debug_string::{to_debug_string, to_js_expression};
pub use escape::{
    EscapeType, UnknownEscapeType, css_escape, escape, html_escape, js_escape, shell_escape,
};

use crate::builder::Encoding;
use crate::parser::{ModifierCall, RAW_MODIFIER};
use crate::types::{Args, Literal, Value};

/// Information available to every modifier invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierContext {
    pub encoding: Encoding,
}

/// A value transform that can be registered under a name.
pub trait Modifier: Send + Sync {
    fn apply(&self, value: Value, args: &Args, context: &ModifierContext) -> Value;
}

/// Signature of a closure registered as a modifier.
pub type ModifierFn = dyn Fn(Value, &Args, &ModifierContext) -> Value + Send + Sync;

/// Modifiers shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinModifier {
    /// Passes the value through; its presence disables automatic escaping.
    Raw,
    /// `escape(type, encoding)`.
    Escape,
    /// `date(format)`: formats a Unix timestamp.
    Date,
    /// `strtotime(baseTimestamp)`: parses a date description.
    Strtotime,
    /// `js_expr`: renders the value as a JavaScript expression.
    JsExpr,
    /// `to_debug(depth)`: renders the value for debugging.
    ToDebugString,
}

impl BuiltinModifier {
    /// Names registered by [`ModifierRegistry::with_builtins`].
    pub const DEFAULT_NAMES: [(&'static str, BuiltinModifier); 9] = [
        (RAW_MODIFIER, BuiltinModifier::Raw),
        ("escape", BuiltinModifier::Escape),
        ("e", BuiltinModifier::Escape),
        ("date", BuiltinModifier::Date),
        ("strtotime", BuiltinModifier::Strtotime),
        ("js_expr", BuiltinModifier::JsExpr),
        ("to_debug", BuiltinModifier::ToDebugString),
        ("to_debug_str", BuiltinModifier::ToDebugString),
        ("to_debug_string", BuiltinModifier::ToDebugString),
    ];
}

impl Modifier for BuiltinModifier {
    fn apply(&self, value: Value, args: &Args, context: &ModifierContext) -> Value {
        match self {
            BuiltinModifier::Raw => value,
            BuiltinModifier::Escape => {
                let escape_type = args.get("type", 0).and_then(Literal::as_str);
                let encoding = args
                    .get("encoding", 1)
                    .and_then(Literal::as_str)
                    .and_then(|name| name.parse().ok())
                    .unwrap_or(context.encoding);
                let text = value.to_string();
                match escape_type.map(str::parse::<EscapeType>) {
                    None => Value::String(escape(&text, EscapeType::Html, encoding)),
                    Some(Ok(escape_type)) => Value::String(escape(&text, escape_type, encoding)),
                    Some(Err(error)) => {
                        debug!(%error, "unknown escape type; value left unescaped");
                        Value::String(text)
                    }
                }
            }
            BuiltinModifier::Date => {
                let format = args
                    .get("format", 0)
                    .and_then(Literal::as_str)
                    .unwrap_or(DEFAULT_DATE_FORMAT);
                let timestamp = value.to_int_lossy().unwrap_or_default();
                Value::String(format_date(timestamp, format))
            }
            BuiltinModifier::Strtotime => {
                let base = args
                    .get("baseTimestamp", 0)
                    .and_then(Literal::as_int)
                    .unwrap_or_else(datetime::now);
                strtotime(&value.to_string(), base).map_or(Value::Null, Value::Int)
            }
            BuiltinModifier::JsExpr => Value::String(to_js_expression(&value, context.encoding)),
            BuiltinModifier::ToDebugString => {
                let depth = args
                    .get("depth", 0)
                    .and_then(Literal::as_int)
                    .unwrap_or_default();
                Value::String(to_debug_string(&value, depth))
            }
        }
    }
}

/// A registered modifier implementation.
#[derive(Clone)]
pub enum ModifierKind {
    Builtin(BuiltinModifier),
    Closure(Arc<ModifierFn>),
    Instance(Arc<dyn Modifier>),
}

impl ModifierKind {
    pub fn apply(&self, value: Value, args: &Args, context: &ModifierContext) -> Value {
        match self {
            ModifierKind::Builtin(builtin) => builtin.apply(value, args, context),
            ModifierKind::Closure(f) => f(value, args, context),
            ModifierKind::Instance(modifier) => modifier.apply(value, args, context),
        }
    }
}

impl Debug for ModifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ModifierKind::Builtin(builtin) => write!(f, "Builtin({builtin:?})"),
            ModifierKind::Closure(_) => f.write_str("Closure(..)"),
            ModifierKind::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// Mapping from modifier name to implementation.
///
/// # Example
///
/// ```
/// use strbuild::{ModifierContext, ModifierRegistry, Encoding, Value, parse_pipeline};
///
/// let mut registry = ModifierRegistry::with_builtins();
/// registry.insert_fn("upper", |value, _args, _context| {
///     Value::String(value.to_string().to_uppercase())
/// });
///
/// let pipeline = parse_pipeline("upper|e", "|");
/// let context = ModifierContext { encoding: Encoding::Utf8 };
/// let value = registry.apply_pipeline(Value::from("<b>"), &pipeline, &context, None);
/// assert_eq!(value, Value::from("&lt;B&gt;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModifierRegistry {
    modifiers: HashMap<String, ModifierKind>,
}

impl ModifierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in modifiers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, builtin) in BuiltinModifier::DEFAULT_NAMES {
            registry.insert(name, ModifierKind::Builtin(builtin));
        }
        registry
    }

    /// Registers a modifier, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, kind: ModifierKind) {
        self.modifiers.insert(name.into(), kind);
    }

    pub fn insert_fn(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(Value, &Args, &ModifierContext) -> Value + Send + Sync + 'static,
    ) {
        self.insert(name, ModifierKind::Closure(Arc::new(f)));
    }

    pub fn insert_instance(&mut self, name: impl Into<String>, modifier: impl Modifier + 'static) {
        self.insert(name, ModifierKind::Instance(Arc::new(modifier)));
    }

    pub fn remove(&mut self, name: &str) -> Option<ModifierKind> {
        self.modifiers.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ModifierKind> {
        self.modifiers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modifiers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Applies `pipeline` to `value` in order.
    ///
    /// Unknown modifier names are skipped. When `auto_escape` is set and no
    /// stage is named `raw`, the value is escaped with that type after the
    /// last stage.
    pub fn apply_pipeline(
        &self,
        value: Value,
        pipeline: &[ModifierCall],
        context: &ModifierContext,
        auto_escape: Option<EscapeType>,
    ) -> Value {
        let mut value = value;
        let mut raw = false;
        for call in pipeline {
            raw |= call.name == RAW_MODIFIER;
            match self.modifiers.get(&call.name) {
                Some(modifier) => value = modifier.apply(value, &call.args, context),
                None => debug!(modifier = %call.name, "unknown modifier skipped"),
            }
        }
        match auto_escape {
            Some(escape_type) if !raw => {
                Value::String(escape(&value.to_string(), escape_type, context.encoding))
            }
            _ => value,
        }
    }
}
