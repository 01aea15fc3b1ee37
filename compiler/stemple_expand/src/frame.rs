//! Frames: one character source plus the metadata the expander tracks for it.

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::position::Position;
use crate::source::CharSource;

/// Identity of a frame, unique within one expander.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u32);

impl FrameId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        FrameId(raw)
    }
}

/// Output-shaping state for the line a frame is currently producing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LineState {
    /// A printing character has been emitted on the line.
    pub graph_seen: bool,
    /// A non-printing directive was processed on the line.
    pub directive_seen: bool,
}

impl LineState {
    /// Lines holding nothing but non-printing directives disappear.
    #[inline]
    pub fn swallows(self) -> bool {
        self.directive_seen && !self.graph_seen
    }
}

/// Arguments of one invocation.
///
/// Shared by the invoked frame and every frame pushed on its behalf that
/// has no arguments of its own (argument-less macro calls, substituted
/// arguments, inline `if` branches, eager values), so `$(1)` keeps
/// resolving against the invocation after its body frame has been popped.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ArgScope {
    origin: String,
    args: Vec<String>,
}

impl ArgScope {
    pub fn new(origin: impl Into<String>, args: Vec<String>) -> Self {
        ArgScope {
            origin: origin.into(),
            args,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// 1-based positional argument.
    pub fn arg(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.args.get(i))
            .map(String::as_str)
    }
}

pub(crate) struct Frame {
    id: FrameId,
    /// Frame whose line state this frame's characters belong to. Equal to
    /// `id` except for putback frames, which report for the frame the
    /// character originally came from.
    owner: FrameId,
    origin: String,
    path: Option<PathBuf>,
    position: Position,
    scope: Option<Rc<ArgScope>>,
    /// Whether characters are scanned for escapes and directives. Eager
    /// macro bodies and quoted substitutions are not.
    scan: bool,
    pub line: LineState,
    source: CharSource,
}

impl Frame {
    pub fn new(id: FrameId, origin: impl Into<String>, source: CharSource) -> Self {
        Frame {
            id,
            owner: id,
            origin: origin.into(),
            path: None,
            position: Position::default(),
            scope: None,
            scan: true,
            line: LineState::default(),
            source,
        }
    }

    /// Open `path` as a file-backed frame.
    pub fn file(id: FrameId, path: &Path) -> io::Result<Self> {
        let source = CharSource::file(path)?;
        Ok(Frame::new(id, path.display().to_string(), source).with_path(path.to_path_buf()))
    }

    pub fn putback(id: FrameId, owner: FrameId, chars: &[char], scan: bool) -> Self {
        let mut frame = Frame::new(id, "putback", CharSource::putback(chars.iter().copied()));
        frame.owner = owner;
        frame.scan = scan;
        frame
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Option<Rc<ArgScope>>) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    #[must_use]
    pub fn with_scan(mut self, scan: bool) -> Self {
        self.scan = scan;
        self
    }

    #[inline]
    pub fn id(&self) -> FrameId {
        self.id
    }

    #[inline]
    pub fn owner(&self) -> FrameId {
        self.owner
    }

    #[inline]
    pub fn scans(&self) -> bool {
        self.scan
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn scope(&self) -> Option<&Rc<ArgScope>> {
        self.scope.as_ref()
    }

    pub fn is_putback(&self) -> bool {
        self.source.is_putback()
    }

    pub fn is_spent(&self) -> bool {
        self.source.is_spent()
    }

    pub fn peek(&mut self) -> io::Result<Option<char>> {
        self.source.peek()
    }

    pub fn is_exhausted(&mut self) -> io::Result<bool> {
        Ok(self.source.peek()?.is_none())
    }

    pub fn next_char(&mut self, tab_size: u32) -> io::Result<Option<char>> {
        let c = self.source.next_char()?;
        if let Some(c) = c {
            self.position.advance(c, tab_size);
        }
        Ok(c)
    }

    /// `origin:line:column` for diagnostics.
    pub fn location(&self) -> String {
        format!("{}:{}", self.origin, self.position)
    }
}
