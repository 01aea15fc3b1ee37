//! The expander: drives frames through the scanner and the output shaper.
//!
//! # Architecture
//!
//! Every entry point pushes one frame and calls `run`, which drains that
//! frame (and everything pushed above it) into a [`Shaper`]. Directives are
//! handled inside the character reader itself: when `next_char` meets
//! `intro open` it parses and resolves the directive, which usually pushes
//! a new frame, and then carries on reading. The caller only ever sees the
//! replacement text.
//!
//! - `scan.rs` - escape handling and directive detection
//! - `directive.rs` - tokenizer, argument collection, macro resolution
//! - `dispatch.rs` - builtin directives
//!
//! # Nesting
//!
//! Eager assignments expand their value through a nested `run` on the same
//! frame stack. A floor keeps the nested run from reading the frames of its
//! caller; conditional blocks it leaves open are discarded when it returns.
//! Both directive processing and nested runs go through
//! [`ensure_sufficient_stack`](stemple_stack::ensure_sufficient_stack) and
//! the configured [`DepthLimit`].

mod directive;
mod dispatch;
mod scan;

use std::io::{Read, Write};
use std::path::Path;
use std::rc::Rc;

use stemple_stack::{ensure_sufficient_stack, DepthLimit};
use tracing::{debug, warn};

use crate::chars::is_space;
use crate::conditional::ConditionalStack;
use crate::frame::{ArgScope, Frame};
use crate::frame_stack::FrameStack;
use crate::macros::MacroTable;
use crate::shaper::Shaper;
use crate::source::CharSource;
use crate::{ExpandConfig, ExpandError, ExpandResult, SpecialChars};

use scan::Scan;

/// A macro expander.
///
/// One instance owns its macro table, frame stack and conditional state;
/// nothing is shared between instances. Macros persist across calls to
/// [`expand`](Expander::expand), so definitions made by one document are
/// visible to the next.
pub struct Expander {
    config: ExpandConfig,
    macros: MacroTable,
    frames: FrameStack,
    conds: ConditionalStack,
    depth: DepthLimit,
    /// Argument scope of the directive being resolved.
    scope: Option<Rc<ArgScope>>,
    /// Macro and argument substitutions since the current top-level call
    /// started.
    calls: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Expander::new()
    }
}

impl Expander {
    pub fn new() -> Self {
        Expander::with_config(ExpandConfig::default())
    }

    pub fn with_config(config: ExpandConfig) -> Self {
        Expander {
            config,
            macros: MacroTable::new(),
            frames: FrameStack::new(config.tab_size.max(1)),
            conds: ConditionalStack::new(),
            depth: DepthLimit::new(config.max_depth),
            scope: None,
            calls: 0,
        }
    }

    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// Replace the five syntax characters. Text already stored in macros is
    /// not rewritten.
    pub fn set_special_chars(&mut self, chars: SpecialChars) {
        self.config.chars = chars;
    }

    pub fn special_chars(&self) -> SpecialChars {
        self.config.chars
    }

    /// Define `name`. An eager body is expanded now and stored verbatim;
    /// a deferred body is stored raw and expanded on every invocation.
    pub fn set_macro(&mut self, name: &str, body: &str, eager: bool) -> ExpandResult<()> {
        let body = if eager {
            self.expand(body)?
        } else {
            body.to_string()
        };
        self.macros.define(name, body, eager);
        Ok(())
    }

    /// Stored body of `name` (raw for deferred macros).
    pub fn macro_body(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(|m| m.body())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains(name)
    }

    /// Names of all defined macros, sorted.
    pub fn macro_names(&self) -> Vec<&str> {
        self.macros.names()
    }

    /// Expand a self-contained string.
    pub fn expand(&mut self, text: &str) -> ExpandResult<String> {
        let mut out = Vec::with_capacity(text.len());
        let id = self.frames.next_id();
        self.run(Frame::new(id, "input", CharSource::text(text)), &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Expand `input` into `output`, line by line. `name` labels the input
    /// in diagnostics. Includes resolve against the working directory.
    pub fn expand_stream<R: Read + 'static>(
        &mut self,
        input: R,
        name: &str,
        output: &mut dyn Write,
    ) -> ExpandResult<()> {
        let id = self.frames.next_id();
        self.run(Frame::new(id, name, CharSource::reader(input)), output)
    }

    /// Expand the file at `path` into `output`. Includes resolve against
    /// the file's directory.
    pub fn expand_file(&mut self, path: impl AsRef<Path>, output: &mut dyn Write) -> ExpandResult<()> {
        let path = path.as_ref();
        let id = self.frames.next_id();
        let frame = Frame::file(id, path).map_err(|source| ExpandError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.run(frame, output)
    }

    /// Drain `frame` and everything pushed above it into `out`.
    fn run(&mut self, frame: Frame, out: &mut dyn Write) -> ExpandResult<()> {
        let base = self.frames.len();
        if base == 0 {
            self.calls = 0;
        }
        let floor = self.frames.set_floor(base);
        let snapshot = self.conds.snapshot();
        debug!(origin = frame.origin(), nested = base > 0, "expanding");

        self.frames.push(frame);
        let result = self.drain(out);

        self.frames.truncate(base);
        self.frames.set_floor(floor);
        let dangling = self.conds.restore(snapshot);
        if dangling > 0 && result.is_ok() {
            warn!(dangling, "unterminated if discarded at end of input");
        }
        result
    }

    fn drain(&mut self, out: &mut dyn Write) -> ExpandResult<()> {
        let mut shaper = Shaper::new(out);
        let mut last_owner = None;

        while let Some(scanned) = self.next_char(Scan::Text)? {
            if self.conds.is_skipping() {
                continue;
            }
            last_owner = Some(scanned.owner);
            match scanned.ch {
                '\n' => {
                    if scanned.escaped {
                        self.frames.clear_directive(scanned.owner);
                    }
                    let line = self.frames.take_line(scanned.owner);
                    shaper.end_line(!line.swallows())?;
                }
                c if is_space(c) => shaper.space(c)?,
                c => {
                    self.frames.mark_graph();
                    shaper.graph(c)?;
                }
            }
        }

        let emit = last_owner.map_or(true, |owner| !self.frames.take_line(owner).swallows());
        shaper.finish(emit)
    }

    /// Expand `text` to a string through a nested run (eager assignment).
    fn expand_nested(&mut self, text: &str, origin: &str) -> ExpandResult<String> {
        self.enter_nesting()?;
        let mut out = Vec::with_capacity(text.len());
        let id = self.frames.next_id();
        let frame = Frame::new(id, format!("value of {origin}"), CharSource::text(text))
            .with_scope(self.scope.clone());
        let result = ensure_sufficient_stack(|| self.run(frame, &mut out));
        self.depth.exit();
        result?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn enter_nesting(&mut self) -> ExpandResult<()> {
        self.depth
            .enter()
            .map_err(|exceeded| ExpandError::RecursionLimit {
                limit: exceeded.limit,
                location: self.frames.location(),
            })
    }

    /// Count one macro or argument substitution against the call budget.
    fn count_call(&mut self) -> ExpandResult<()> {
        self.calls += 1;
        match self.config.call_budget {
            Some(budget) if self.calls > budget => Err(ExpandError::BudgetExceeded {
                budget,
                location: self.frames.location(),
            }),
            _ => Ok(()),
        }
    }

    /// Push replacement text as a new frame, read under the current
    /// directive's argument scope.
    fn push_text(&mut self, origin: String, text: &str, scan: bool) {
        let id = self.frames.next_id();
        let frame = Frame::new(id, origin, CharSource::text(text))
            .with_scan(scan)
            .with_scope(self.scope.clone());
        self.frames.push(frame);
    }

    /// Scope for a frame invoked with `args`: a fresh one if there are any,
    /// otherwise the invoker's.
    fn scope_for(&self, origin: &str, args: Vec<String>) -> Option<Rc<ArgScope>> {
        if args.is_empty() {
            self.scope.clone()
        } else {
            Some(Rc::new(ArgScope::new(origin, args)))
        }
    }
}
