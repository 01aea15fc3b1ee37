//! Stack safety for recursive expansion.
//!
//! Directive processing recurses through ordinary function calls: a directive
//! inside an argument list is expanded while the outer directive is still
//! being collected, and eager assignments run a complete sub-expansion. Two
//! tools keep that recursion from taking the process down:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand (via
//!   `stacker`) so deep but legitimate nesting does not overflow.
//! - [`DepthLimit`] counts nesting and fails closed once a configured bound
//!   is crossed, turning runaway self-reference into an error.
//!
//! On WASM targets stack growth is a passthrough.

use std::fmt;

/// Minimum stack space to keep available (64KB red zone).
const RED_ZONE: usize = 64 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Error returned by [`DepthLimit::enter`] when the bound is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    /// The configured maximum depth.
    pub limit: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nesting depth limit of {} exceeded", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Nesting counter with an optional upper bound.
///
/// `enter` and `exit` must be paired; the expander does this around each
/// recursive call. A limit of `None` never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthLimit {
    depth: usize,
    limit: Option<usize>,
}

impl DepthLimit {
    pub fn new(limit: Option<usize>) -> Self {
        DepthLimit { depth: 0, limit }
    }

    /// Current nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Enter one level of nesting.
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if let Some(limit) = self.limit {
            if self.depth >= limit {
                return Err(DepthExceeded { limit });
            }
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of nesting. Saturates at zero.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
