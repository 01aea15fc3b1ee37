//! Output line shaping.
//!
//! Whitespace before the first printing character of a line is held back.
//! When the line ends, the caller decides (from frame line state) whether
//! the held whitespace and the newline are written or dropped. A line that
//! only held non-printing directives thereby vanishes completely.

use std::io::Write;

use crate::{ExpandError, ExpandResult};

pub(crate) struct Shaper<'a> {
    out: &'a mut dyn Write,
    pending: String,
    graph_on_line: bool,
    buf: [u8; 4],
}

impl<'a> Shaper<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Shaper {
            out,
            pending: String::new(),
            graph_on_line: false,
            buf: [0; 4],
        }
    }

    fn write_char(&mut self, c: char) -> ExpandResult<()> {
        let encoded = c.encode_utf8(&mut self.buf);
        self.out
            .write_all(encoded.as_bytes())
            .map_err(ExpandError::output)
    }

    fn flush_pending(&mut self) -> ExpandResult<()> {
        if !self.pending.is_empty() {
            self.out
                .write_all(self.pending.as_bytes())
                .map_err(ExpandError::output)?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Whitespace other than a newline.
    pub fn space(&mut self, c: char) -> ExpandResult<()> {
        if self.graph_on_line {
            self.write_char(c)
        } else {
            self.pending.push(c);
            Ok(())
        }
    }

    /// A printing character.
    pub fn graph(&mut self, c: char) -> ExpandResult<()> {
        self.flush_pending()?;
        self.graph_on_line = true;
        self.write_char(c)
    }

    /// End of line: write the held whitespace and the newline, or drop both.
    pub fn end_line(&mut self, emit: bool) -> ExpandResult<()> {
        if emit {
            self.flush_pending()?;
            self.write_char('\n')?;
        } else {
            self.pending.clear();
        }
        self.graph_on_line = false;
        Ok(())
    }

    /// End of input. A trailing line without a newline keeps its held
    /// whitespace unless it is swallowed.
    pub fn finish(&mut self, emit: bool) -> ExpandResult<()> {
        if emit {
            self.flush_pending()?;
        } else {
            self.pending.clear();
        }
        self.graph_on_line = false;
        self.out.flush().map_err(ExpandError::output)
    }
}
