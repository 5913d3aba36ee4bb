use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use super::Value;

/// A literal argument written inside a modifier call, e.g. the `'Y-m-d'` in
/// `{:ts|date('Y-m-d')}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    /// An unquoted word or path such as `html` or `\app\Format::class`.
    Bare(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Returns the text of a quoted string or a bare word.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) | Literal::Bare(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(*n),
            Literal::Float(f) => Some(*f as i64),
            Literal::String(s) | Literal::Bare(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Converts the literal into a runtime value. Bare words become strings.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(f) => Value::Float(*f),
            Literal::String(s) | Literal::Bare(s) => Value::String(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
            Literal::List(items) => Value::List(items.iter().map(Literal::to_value).collect()),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n:?}"),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
            Literal::Bare(s) => f.write_str(s),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Key of a modifier argument: its position among positional arguments, or
/// an explicit parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ArgKey {
    Index(usize),
    Name(String),
}

impl Display for ArgKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArgKey::Index(i) => write!(f, "{i}"),
            ArgKey::Name(name) => f.write_str(name),
        }
    }
}

/// Ordered arguments of one modifier call.
///
/// Positional arguments are numbered in the order they appear; named
/// arguments do not consume a position. Setting a name twice keeps the
/// original position and replaces the value.
///
/// # Example
///
/// ```
/// use strbuild::{Args, Literal};
///
/// let mut args = Args::new();
/// args.push(Literal::String("Y-m-d".into()));
/// args.insert("tz", Literal::Bare("utc".into()));
///
/// assert_eq!(args.get("format", 0), Some(&Literal::String("Y-m-d".into())));
/// assert_eq!(args.named("tz").and_then(Literal::as_str), Some("utc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Args {
    entries: Vec<(ArgKey, Literal)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn push(&mut self, value: Literal) {
        let index = self.positional_count();
        self.entries.push((ArgKey::Index(index), value));
    }

    /// Sets a named argument.
    pub fn insert(&mut self, name: impl Into<String>, value: Literal) {
        let key = ArgKey::Name(name.into());
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Looks up a named argument, falling back to a positional one.
    pub fn get(&self, name: &str, index: usize) -> Option<&Literal> {
        self.named(name).or_else(|| self.positional(index))
    }

    pub fn named(&self, name: &str) -> Option<&Literal> {
        self.entries.iter().find_map(|(key, value)| match key {
            ArgKey::Name(n) if n == name => Some(value),
            _ => None,
        })
    }

    pub fn positional(&self, index: usize) -> Option<&Literal> {
        self.entries.iter().find_map(|(key, value)| match key {
            ArgKey::Index(i) if *i == index => Some(value),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgKey, &Literal)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn positional_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(key, _)| matches!(key, ArgKey::Index(_)))
            .count()
    }
}

impl FromIterator<Literal> for Args {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut args = Args::new();
        for literal in iter {
            args.push(literal);
        }
        args
    }
}
