//! Placeholder scanner.

/// Location of one placeholder in a template, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the begin marker.
    pub start: usize,
    /// Offset just past the end marker.
    pub end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
}

impl Span {
    /// The whole matched span, markers included.
    pub fn raw<'t>(&self, template: &'t str) -> &'t str {
        &template[self.start..self.end]
    }

    /// The text between the markers.
    pub fn inner<'t>(&self, template: &'t str) -> &'t str {
        &template[self.inner_start..self.inner_end]
    }
}

/// Finds the next placeholder to resolve.
///
/// Picks the rightmost `begin` marker lying entirely before `limit` (the
/// whole template when `None`) and pairs it with the first `end` marker
/// after it. Picking the rightmost begin resolves `{:{:inner}}` from the
/// inside out. A begin marker with no end marker after it is literal text;
/// the search continues to its left.
///
/// # Example
///
/// ```
/// use strbuild::find_next;
///
/// let template = "{:a} and {:{:b}}";
/// let span = find_next(template, None, "{:", "}").unwrap();
/// assert_eq!(span.raw(template), "{:b}");
/// ```
pub fn find_next(template: &str, limit: Option<usize>, begin: &str, end: &str) -> Option<Span> {
    if begin.is_empty() || end.is_empty() {
        return None;
    }
    let mut limit = limit.unwrap_or(template.len()).min(template.len());
    while !template.is_char_boundary(limit) {
        limit -= 1;
    }
    loop {
        let start = template[..limit].rfind(begin)?;
        let inner_start = start + begin.len();
        if let Some(offset) = template[inner_start..].find(end) {
            let inner_end = inner_start + offset;
            return Some(Span {
                start,
                end: inner_end + end.len(),
                inner_start,
                inner_end,
            });
        }
        limit = start;
    }
}

/// Returns `true` when `text` holds at least one complete placeholder.
pub fn contains_placeholder(text: &str, begin: &str, end: &str) -> bool {
    find_next(text, None, begin, end).is_some()
}
