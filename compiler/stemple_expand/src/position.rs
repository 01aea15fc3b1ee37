//! Offset/line/column bookkeeping for frames.

use std::fmt;

/// Location of the next character a frame will yield.
///
/// Lines and columns are 1-based; the offset counts characters (not bytes)
/// from the start of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Position {
    /// Step past `c`. Tabs advance to the next multiple of `tab_size`.
    pub fn advance(&mut self, c: char, tab_size: u32) {
        self.offset += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => {
                let tab = tab_size.max(1);
                self.column = ((self.column - 1) / tab + 1) * tab + 1;
            }
            _ => self.column += 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
