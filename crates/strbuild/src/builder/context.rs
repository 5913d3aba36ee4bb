//! Build context for tracking state during recursive interpolation.

use tracing::{debug, warn};

use crate::builder::config::BuildLimits;

/// State carried through one top-level build and all of its recursive
/// interpolations.
///
/// The context tracks:
/// - The texts currently being interpolated, for cycle detection
/// - Recursion depth, bounded by [`BuildLimits::max_depth`]
/// - Remaining substitutions, bounded by [`BuildLimits::max_substitutions`]
/// - How often entering was refused, so callers can tell that a replacement
///   was cut short
#[derive(Debug)]
pub struct BuildContext {
    /// Texts under interpolation, outermost first.
    stack: Vec<String>,
    max_depth: usize,
    remaining: usize,
    exhausted: bool,
    refusals: usize,
}

impl BuildContext {
    pub fn new(limits: BuildLimits) -> Self {
        Self {
            stack: Vec::new(),
            max_depth: limits.max_depth(),
            remaining: limits.max_substitutions(),
            exhausted: false,
            refusals: 0,
        }
    }

    /// Check if a text is already being interpolated further up.
    pub fn is_active(&self, text: &str) -> bool {
        self.stack.iter().any(|active| active == text)
    }

    /// Enter interpolation of `text`.
    ///
    /// Returns `false`, leaving the stack unchanged, when `text` is already
    /// being interpolated or the depth limit is reached.
    pub fn enter(&mut self, text: &str) -> bool {
        if self.stack.len() >= self.max_depth {
            debug!(depth = self.stack.len(), "interpolation depth limit reached");
            self.refusals += 1;
            return false;
        }
        if self.is_active(text) {
            debug!(text, "recursive interpolation cycle cut");
            self.refusals += 1;
            return false;
        }
        self.stack.push(text.to_string());
        true
    }

    /// Leave the innermost interpolation.
    pub fn leave(&mut self) {
        self.stack.pop();
    }

    /// Number of times [`enter`](Self::enter) has refused so far.
    pub fn refusals(&self) -> usize {
        self.refusals
    }

    /// Get current recursion depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Takes one substitution from the budget; `false` once it is spent.
    pub fn consume_substitution(&mut self) -> bool {
        if self.remaining == 0 {
            if !self.exhausted {
                warn!("substitution budget exhausted; remaining placeholders left as is");
                self.exhausted = true;
            }
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
