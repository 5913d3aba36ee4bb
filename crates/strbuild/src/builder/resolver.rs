//! Resolving placeholder names to values.

use tracing::trace;

use crate::types::{Value, Values};

/// External lookup consulted before the variable mapping.
///
/// Returning `None`, or returning the raw placeholder span unchanged, means
/// the converter has no opinion and the lookup falls through to the values.
///
/// Any `Fn(&str, &str, &Values) -> Option<String>` closure is a converter.
///
/// # Example
///
/// ```
/// use strbuild::{Converter, Values};
///
/// struct Links;
///
/// impl Converter for Links {
///     fn convert(&self, name: &str, _raw: &str, _values: &Values) -> Option<String> {
///         (name == "home").then(|| "https://example.com/".to_string())
///     }
/// }
///
/// assert_eq!(Links.convert("home", "{:home}", &Values::new()).as_deref(), Some("https://example.com/"));
/// ```
pub trait Converter: Send + Sync {
    /// Converts `name`; `raw` is the whole placeholder span as written.
    fn convert(&self, name: &str, raw: &str, values: &Values) -> Option<String>;
}

impl<F> Converter for F
where
    F: Fn(&str, &str, &Values) -> Option<String> + Send + Sync,
{
    fn convert(&self, name: &str, raw: &str, values: &Values) -> Option<String> {
        self(name, raw, values)
    }
}

/// Outcome of resolving a placeholder's names.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// `name` is the candidate that matched.
    Found { name: String, value: Value },
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::Found { value, .. } => Some(value),
            Resolution::NotFound => None,
        }
    }
}

/// Resolves the first of `names` that yields a value.
///
/// For each candidate in order, the converter is asked first; a result other
/// than `None` or `raw` itself wins. Otherwise the candidate is looked up in
/// `values`, where an explicit [`Value::Null`] also counts as found. Lazy
/// values are invoked with the matching candidate.
///
/// # Example
///
/// ```
/// use strbuild::{Resolution, Value, resolve, values};
///
/// let values = values! { "0" => "zero" };
/// let names = vec!["missing".to_string(), "0".to_string()];
/// assert_eq!(
///     resolve(&names, &values, None, "{:missing:0}"),
///     Resolution::Found { name: "0".to_string(), value: Value::from("zero") },
/// );
/// ```
pub fn resolve(
    names: &[String],
    values: &Values,
    converter: Option<&dyn Converter>,
    raw: &str,
) -> Resolution {
    for name in names {
        if let Some(converted) = converter.and_then(|c| c.convert(name, raw, values)) {
            if converted != raw {
                trace!(%name, "resolved by converter");
                return Resolution::Found {
                    name: name.clone(),
                    value: Value::String(converted),
                };
            }
        }
        if let Some(value) = values.get(name) {
            trace!(%name, "resolved from values");
            return Resolution::Found {
                name: name.clone(),
                value: value.clone().force(name, raw, values),
            };
        }
    }
    Resolution::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn converter_is_asked_per_candidate() {
        let second_only = |name: &str, _: &str, _: &Values| (name == "b").then(|| "B".to_string());
        let resolution = resolve(&names(&["a", "b"]), &values! { "a" => "A" }, Some(&second_only), "{:a:b}");
        assert_eq!(
            resolution,
            Resolution::Found {
                name: "a".to_string(),
                value: Value::from("A"),
            }
        );
    }

    #[test]
    fn converter_echo_means_no_opinion() {
        let echo = |_: &str, raw: &str, _: &Values| Some(raw.to_string());
        assert_eq!(resolve(&names(&["a"]), &values! {}, Some(&echo), "{:a}"), Resolution::NotFound);
    }

    #[test]
    fn null_is_found() {
        let resolution = resolve(&names(&["z"]), &values! { "z" => Value::Null }, None, "{:z}");
        assert!(resolution.is_found());
        assert_eq!(resolution.into_value(), Some(Value::Null));
    }

    #[test]
    fn lazy_value_is_forced_with_matching_candidate() {
        let values = values! { "b" => Value::lazy(|name, raw, _| Value::from(format!("{name} in {raw}"))) };
        let resolution = resolve(&names(&["a", "b"]), &values, None, "{:a:b}");
        assert_eq!(resolution.into_value(), Some(Value::from("b in {:a:b}")));
    }
}
