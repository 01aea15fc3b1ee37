//! Expander configuration.

use crate::SpecialChars;

/// Default nesting bound for directive processing.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default number of macro invocations allowed per top-level expansion.
pub const DEFAULT_CALL_BUDGET: usize = 1_000_000;

/// Tunables for an [`Expander`](crate::Expander).
///
/// The guards default to generous limits. Setting either to `None`
/// restores the unguarded behavior, in which a self-referencing macro such
/// as `$(A=$(A))$(A)` never terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandConfig {
    /// Directive syntax characters.
    pub chars: SpecialChars,
    /// Maximum nesting of directives inside directive arguments and
    /// eager sub-expansions.
    pub max_depth: Option<usize>,
    /// Maximum macro and argument substitutions per top-level call.
    pub call_budget: Option<usize>,
    /// Tab stop width used for diagnostic column numbers.
    pub tab_size: u32,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        ExpandConfig {
            chars: SpecialChars::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            call_budget: Some(DEFAULT_CALL_BUDGET),
            tab_size: 4,
        }
    }
}

impl ExpandConfig {
    #[must_use]
    pub fn with_chars(mut self, chars: SpecialChars) -> Self {
        self.chars = chars;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_call_budget(mut self, call_budget: Option<usize>) -> Self {
        self.call_budget = call_budget;
        self
    }

    /// Tab width; zero is treated as one.
    #[must_use]
    pub fn with_tab_size(mut self, tab_size: u32) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }
}
