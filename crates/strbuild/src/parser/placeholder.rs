//! Splitting a placeholder's inner text into names and modifiers.

use crate::parser::pipeline::{ModifierCall, parse_pipeline};

/// A placeholder broken into its name alternatives and modifier pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Names to try, in order.
    pub names: Vec<String>,
    pub pipeline: Vec<ModifierCall>,
}

impl Placeholder {
    /// Parses the text between the enclosure markers.
    ///
    /// The text is split once on `modifier_separator`; the left part is then
    /// split on every `name_separator`. A name without separators yields a
    /// single candidate.
    ///
    /// ```
    /// use strbuild::Placeholder;
    ///
    /// let placeholder = Placeholder::parse("title:name|e", ":", "|");
    /// assert_eq!(placeholder.names, vec!["title", "name"]);
    /// assert_eq!(placeholder.pipeline[0].name, "e");
    /// ```
    pub fn parse(inner: &str, name_separator: &str, modifier_separator: &str) -> Self {
        let (name, modifiers) = match inner.split_once(modifier_separator) {
            Some((name, modifiers)) if !modifier_separator.is_empty() => (name, Some(modifiers)),
            _ => (inner, None),
        };
        let names = if name_separator.is_empty() {
            vec![name.to_string()]
        } else {
            name.split(name_separator).map(str::to_string).collect()
        };
        let pipeline = modifiers
            .map(|text| parse_pipeline(text, modifier_separator))
            .unwrap_or_default();
        Self { names, pipeline }
    }
}

/// Pipeline stage name that disables automatic escaping.
pub const RAW_MODIFIER: &str = "raw";
