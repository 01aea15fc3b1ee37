//! Errors surfaced by the expander.
//!
//! Most problems inside a template never reach this type: malformed
//! directives, undefined macros and failed includes all degrade to empty
//! output so that one bad directive cannot abort a whole document. What
//! remains are conditions the caller has to know about: unreadable input,
//! unwritable output, and the recursion guards tripping.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type ExpandResult<T> = Result<T, ExpandError>;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// A top-level input file could not be opened.
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a frame or writing output failed.
    #[error("I/O error in {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// Directive nesting went deeper than `ExpandConfig::max_depth`.
    #[error("directive nesting exceeded {limit} levels at {location}")]
    RecursionLimit { limit: usize, location: String },

    /// More macro invocations than `ExpandConfig::call_budget` allows.
    #[error("macro call budget of {budget} exhausted at {location}")]
    BudgetExceeded { budget: usize, location: String },

    /// Rejected special-character configuration.
    #[error("invalid special characters {chars:?}: {reason}")]
    InvalidSpecialChars { chars: String, reason: &'static str },
}

impl ExpandError {
    pub(crate) fn output(source: io::Error) -> Self {
        ExpandError::Io {
            origin: "output".to_string(),
            source,
        }
    }
}
