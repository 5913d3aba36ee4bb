//! Template parsing: placeholder scanning, name splitting, and the modifier
//! pipeline grammar.
//!
//! Nothing in this module fails. Templates are expected to be resilient to
//! partially missing data, so malformed input degrades to literal text or to
//! best-effort argument lists.

pub mod lexer;
mod pipeline;
mod placeholder;
mod scanner;

pub use pipeline::{ModifierCall, Stage, parse_pipeline, split_stages};
pub use placeholder::{Placeholder, RAW_MODIFIER};
pub use scanner::{Span, contains_placeholder, find_next};
