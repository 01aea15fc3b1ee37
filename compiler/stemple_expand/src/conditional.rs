//! Block conditional state: `if` / `elseif` / `else` / `endif`.
//!
//! One [`IfContext`] per open block, plus a single skip counter shared by
//! all levels. The counter's magnitude matters: every context that is
//! currently suppressing output contributes exactly one to it, so nested
//! blocks inside a skipped branch are unwound by their own `endif`s.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// After `if` or `elseif`; `elseif`, `else` and `endif` are allowed.
    AwaitingElseOrEnd,
    /// After `else`; only `endif` is allowed.
    EndOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfContext {
    pub phase: Phase,
    /// Some branch of this chain has been selected. Contexts opened inside
    /// a skipped region count as taken so none of their branches can
    /// un-skip.
    pub branch_taken: bool,
    /// This context currently contributes to the skip depth.
    pub is_skipping: bool,
}

impl IfContext {
    fn start_skipping(&mut self, skip_depth: &mut usize) {
        if !self.is_skipping {
            self.is_skipping = true;
            *skip_depth += 1;
        }
    }

    fn stop_skipping(&mut self, skip_depth: &mut usize) {
        if self.is_skipping {
            self.is_skipping = false;
            *skip_depth = skip_depth.saturating_sub(1);
        }
    }
}

/// A conditional directive that does not fit the open blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionalError {
    /// `elseif`, `else` or `endif` without an open `if`.
    NoOpenIf,
    /// `elseif` or `else` after the block's `else`.
    AfterElse,
}

impl fmt::Display for ConditionalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalError::NoOpenIf => f.write_str("no matching if"),
            ConditionalError::AfterElse => f.write_str("already past else"),
        }
    }
}

/// Saved nesting, used to unwind blocks a nested expansion left open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    depth: usize,
    skip_depth: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ConditionalStack {
    contexts: Vec<IfContext>,
    skip_depth: usize,
}

impl ConditionalStack {
    pub fn new() -> Self {
        ConditionalStack::default()
    }

    #[inline]
    pub fn skip_depth(&self) -> usize {
        self.skip_depth
    }

    #[inline]
    pub fn is_skipping(&self) -> bool {
        self.skip_depth > 0
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn top(&self) -> Option<&IfContext> {
        self.contexts.last()
    }

    /// Block `if`.
    pub fn open(&mut self, cond: bool) {
        let inherited = self.is_skipping();
        let mut context = IfContext {
            phase: Phase::AwaitingElseOrEnd,
            branch_taken: inherited || cond,
            is_skipping: false,
        };
        if inherited || !cond {
            context.start_skipping(&mut self.skip_depth);
        }
        self.contexts.push(context);
    }

    /// Whether the next `elseif` has to evaluate its condition: an open
    /// chain that has not selected a branch yet.
    pub fn elseif_pending(&self) -> bool {
        self.top()
            .is_some_and(|c| c.phase == Phase::AwaitingElseOrEnd && !c.branch_taken)
    }

    /// Force the skip depth to zero while an `elseif` condition is
    /// collected. Returns the value to hand back to [`resume_skip`].
    ///
    /// [`resume_skip`]: ConditionalStack::resume_skip
    pub fn suspend_skip(&mut self) -> usize {
        std::mem::take(&mut self.skip_depth)
    }

    pub fn resume_skip(&mut self, saved: usize) {
        self.skip_depth = saved;
    }

    pub fn elseif_branch(&mut self, cond: bool) -> Result<(), ConditionalError> {
        let context = self.contexts.last_mut().ok_or(ConditionalError::NoOpenIf)?;
        if context.phase == Phase::EndOnly {
            return Err(ConditionalError::AfterElse);
        }
        if !context.branch_taken && cond {
            context.branch_taken = true;
            context.stop_skipping(&mut self.skip_depth);
        } else {
            context.start_skipping(&mut self.skip_depth);
        }
        Ok(())
    }

    pub fn else_branch(&mut self) -> Result<(), ConditionalError> {
        let context = self.contexts.last_mut().ok_or(ConditionalError::NoOpenIf)?;
        if context.phase == Phase::EndOnly {
            return Err(ConditionalError::AfterElse);
        }
        if context.branch_taken {
            context.start_skipping(&mut self.skip_depth);
        } else {
            context.branch_taken = true;
            context.stop_skipping(&mut self.skip_depth);
        }
        context.phase = Phase::EndOnly;
        Ok(())
    }

    pub fn end(&mut self) -> Result<(), ConditionalError> {
        let mut context = self.contexts.pop().ok_or(ConditionalError::NoOpenIf)?;
        context.stop_skipping(&mut self.skip_depth);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            depth: self.contexts.len(),
            skip_depth: self.skip_depth,
        }
    }

    /// Discard blocks opened since `snapshot`, returning how many there were.
    pub fn restore(&mut self, snapshot: Snapshot) -> usize {
        let dangling = self.contexts.len().saturating_sub(snapshot.depth);
        self.contexts.truncate(snapshot.depth);
        self.skip_depth = snapshot.skip_depth;
        dangling
    }
}
