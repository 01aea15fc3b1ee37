//! Character sources backing frames.
//!
//! Every source supports one character of lookahead. The expander needs it
//! to pop a frame as soon as its last character has been read, so the next
//! read falls through to the parent frame immediately.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use smallvec::SmallVec;

pub(crate) enum CharSource {
    /// Owned copy of a string (macro bodies, arguments, builtin results).
    Text { chars: Vec<char>, pos: usize },
    /// A file or caller-supplied stream, decoded as UTF-8.
    Reader(ReaderSource),
    /// Re-queued characters, stored back to front.
    Putback(SmallVec<[char; 2]>),
}

impl CharSource {
    pub fn text(text: &str) -> Self {
        CharSource::Text {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    pub fn file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(CharSource::Reader(ReaderSource::new(Box::new(
            BufReader::new(file),
        ))))
    }

    pub fn reader(reader: impl Read + 'static) -> Self {
        CharSource::Reader(ReaderSource::new(Box::new(BufReader::new(reader))))
    }

    /// Characters in reading order.
    pub fn putback(chars: impl IntoIterator<Item = char>) -> Self {
        let mut stack: SmallVec<[char; 2]> = chars.into_iter().collect();
        stack.reverse();
        CharSource::Putback(stack)
    }

    pub fn peek(&mut self) -> io::Result<Option<char>> {
        match self {
            CharSource::Text { chars, pos } => Ok(chars.get(*pos).copied()),
            CharSource::Reader(reader) => reader.peek(),
            CharSource::Putback(stack) => Ok(stack.last().copied()),
        }
    }

    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        match self {
            CharSource::Text { chars, pos } => {
                let c = chars.get(*pos).copied();
                if c.is_some() {
                    *pos += 1;
                }
                Ok(c)
            }
            CharSource::Reader(reader) => reader.next_char(),
            CharSource::Putback(stack) => Ok(stack.pop()),
        }
    }

    pub fn is_putback(&self) -> bool {
        matches!(self, CharSource::Putback(_))
    }

    /// Fully consumed, known without touching I/O. Readers report `false`
    /// until a read has actually hit the end.
    pub fn is_spent(&self) -> bool {
        match self {
            CharSource::Text { chars, pos } => *pos >= chars.len(),
            CharSource::Reader(reader) => reader.done && reader.peeked.is_none(),
            CharSource::Putback(stack) => stack.is_empty(),
        }
    }
}

/// UTF-8 decoder over a buffered reader with one character of lookahead.
///
/// Malformed sequences decode to U+FFFD rather than failing the read.
pub(crate) struct ReaderSource {
    reader: Box<dyn BufRead>,
    peeked: Option<char>,
    done: bool,
}

impl ReaderSource {
    fn new(reader: Box<dyn BufRead>) -> Self {
        ReaderSource {
            reader,
            peeked: None,
            done: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.peeked.is_none() && !self.done {
            self.peeked = decode_char(&mut *self.reader)?;
            self.done = self.peeked.is_none();
        }
        Ok(())
    }

    fn peek(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.peeked)
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.peeked.take())
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead`
/// cannot start one.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn decode_char(reader: &mut dyn BufRead) -> io::Result<Option<char>> {
    let mut buf = [0u8; 4];
    loop {
        match reader.read(&mut buf[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }

    let len = sequence_len(buf[0]);
    match len {
        0 => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        1 => return Ok(Some(char::from(buf[0]))),
        _ => {}
    }

    match reader.read_exact(&mut buf[1..len]) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        }
        Err(err) => return Err(err),
    }

    Ok(Some(
        std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER),
    ))
}
