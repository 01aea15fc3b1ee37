//! The stack of frames being read, nearest source first.
//!
//! # Popping
//!
//! A frame is popped as soon as its last character has been read (checked
//! by lookahead), so the following read continues in the parent frame
//! without an intervening empty read. Exhausted frames that reappear on top
//! (see below) are popped before the next read.
//!
//! # Resurrection
//!
//! The most recently popped frame is kept in one dedicated slot. When the
//! character being put back was the last character of that frame, the frame
//! is pushed back beneath the putback frame, so the line the character
//! belongs to is still shaped by the frame that produced it.
//!
//! # Argument scopes
//!
//! Positional arguments are not looked up by walking the stack: a body can
//! be popped while a directive it started is still being resolved. Each
//! frame carries the [`ArgScope`] it reads under instead, and putback frames
//! inherit the scope of the frame their characters came from.
//!
//! # Floor
//!
//! A nested expansion sets a floor at the stack depth where it started.
//! Reads and lookahead never go below the floor, so the nested expansion
//! drains exactly the frames it pushed.

use std::io;
use std::path::Path;
use std::rc::Rc;

use crate::frame::{ArgScope, Frame, FrameId, LineState};
use crate::{ExpandError, ExpandResult};

/// A character as read from the top frame, before escape handling.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawChar {
    pub ch: char,
    /// Line-state owner of the frame the character came from.
    pub owner: FrameId,
    /// Whether that frame is scanned for directives.
    pub scan: bool,
}

pub(crate) struct FrameStack {
    /// Bottom first; the top of the stack is the last element.
    frames: Vec<Frame>,
    popped: Option<Frame>,
    floor: usize,
    next_id: u32,
    tab_size: u32,
}

impl FrameStack {
    pub fn new(tab_size: u32) -> Self {
        FrameStack {
            frames: Vec::new(),
            popped: None,
            floor: 0,
            next_id: 0,
            tab_size,
        }
    }

    pub fn next_id(&mut self) -> FrameId {
        let id = FrameId::from_raw(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Push `frame`, first popping spent frames off the top. A macro that
    /// invokes itself as the last thing in its body would otherwise leave one
    /// spent frame behind per call.
    pub fn push(&mut self, frame: Frame) {
        while self.frames.len() > self.floor && self.frames.last().is_some_and(Frame::is_spent) {
            self.pop();
        }
        self.frames.push(frame);
    }

    /// Set the floor, returning the previous one.
    pub fn set_floor(&mut self, floor: usize) -> usize {
        std::mem::replace(&mut self.floor, floor)
    }

    /// Drop everything above `len`, e.g. after an aborted expansion.
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.popped = Some(frame);
        }
    }

    fn io_error(&self, source: io::Error) -> ExpandError {
        ExpandError::Io {
            origin: self.location(),
            source,
        }
    }

    /// Top frame above the floor, after popping exhausted ones.
    fn live_top(&mut self) -> ExpandResult<Option<&mut Frame>> {
        while self.frames.len() > self.floor {
            let exhausted = match self.frames.last_mut() {
                Some(top) => top.is_exhausted(),
                None => break,
            };
            match exhausted {
                Ok(true) => self.pop(),
                Ok(false) => return Ok(self.frames.last_mut()),
                Err(err) => return Err(self.io_error(err)),
            }
        }
        Ok(None)
    }

    /// Read the next character, popping the frame it came from if that
    /// frame is now exhausted.
    pub fn read(&mut self) -> ExpandResult<Option<RawChar>> {
        let tab_size = self.tab_size;
        let result = match self.live_top()? {
            None => return Ok(None),
            Some(top) => {
                let (owner, scan) = (top.owner(), top.scans());
                top.next_char(tab_size)
                    .and_then(|c| Ok((c, top.is_exhausted()?)))
                    .map(|(c, exhausted)| (c.map(|ch| RawChar { ch, owner, scan }), exhausted))
            }
        };
        match result {
            Ok((raw, exhausted)) => {
                if exhausted {
                    self.pop();
                }
                Ok(raw)
            }
            Err(err) => Err(self.io_error(err)),
        }
    }

    /// Next character across frames, without consuming it.
    pub fn peek(&mut self) -> ExpandResult<Option<char>> {
        let floor = self.floor;
        let mut failure = None;
        for frame in self.frames[floor..].iter_mut().rev() {
            match frame.peek() {
                Ok(Some(c)) => return Ok(Some(c)),
                Ok(None) => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        match failure {
            Some(err) => Err(self.io_error(err)),
            None => Ok(None),
        }
    }

    /// Re-queue `chars` (in reading order) as a putback frame.
    ///
    /// If `owner` is the frame popped most recently, it is resurrected first.
    pub fn push_back(&mut self, chars: &[char], owner: FrameId, scan: bool) {
        if self.popped.as_ref().is_some_and(|f| f.id() == owner) {
            if let Some(frame) = self.popped.take() {
                self.frames.push(frame);
            }
        }
        let scope = self.scope_of(owner);
        let id = self.next_id();
        self.frames
            .push(Frame::putback(id, owner, chars, scan).with_scope(scope));
    }

    fn find_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        if let Some(index) = self.frames.iter().rposition(|f| f.id() == id) {
            return self.frames.get_mut(index);
        }
        self.popped.as_mut().filter(|f| f.id() == id)
    }

    /// Argument scope that characters owned by `owner` are read under.
    /// Putback frames standing in for `owner` carry the same scope, so the
    /// owner itself need not still be on the stack.
    pub fn scope_of(&self, owner: FrameId) -> Option<Rc<ArgScope>> {
        self.frames
            .iter()
            .rev()
            .chain(self.popped.as_ref())
            .find(|f| f.id() == owner || f.owner() == owner)
            .and_then(|f| f.scope().cloned())
    }

    /// Path of the nearest file-backed frame.
    pub fn nearest_path(&self) -> Option<&Path> {
        self.frames.iter().rev().find_map(Frame::path)
    }

    /// A printing character was emitted: it lands on the current line of
    /// every frame being read.
    pub fn mark_graph(&mut self) {
        let floor = self.floor;
        for frame in &mut self.frames[floor..] {
            frame.line.graph_seen = true;
        }
    }

    pub fn mark_directive(&mut self, owner: FrameId) {
        if let Some(frame) = self.find_mut(owner) {
            frame.line.directive_seen = true;
        }
    }

    pub fn clear_directive(&mut self, owner: FrameId) {
        if let Some(frame) = self.find_mut(owner) {
            frame.line.directive_seen = false;
        }
    }

    /// Take the line state of `owner`, resetting it for the next line.
    pub fn take_line(&mut self, owner: FrameId) -> LineState {
        self.find_mut(owner)
            .map(|frame| std::mem::take(&mut frame.line))
            .unwrap_or_default()
    }

    /// `origin:line:column` of the frame currently being read.
    pub fn location(&self) -> String {
        self.frames
            .iter()
            .rev()
            .find(|f| !f.is_putback())
            .or(self.popped.as_ref())
            .map_or_else(|| "<end of input>".to_string(), Frame::location)
    }
}
