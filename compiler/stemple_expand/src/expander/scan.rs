//! Character scanning: escapes and directive detection.

use smallvec::SmallVec;

use super::Expander;
use crate::frame::FrameId;
use crate::ExpandResult;

/// How characters are interpreted while reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Scan {
    /// Ordinary text: directives expand, the escape protects the escape and
    /// intro characters and newlines.
    Text,
    /// Inside a directive: as `Text`, and the escape also protects the
    /// directive delimiters and blanks.
    Directive,
    /// No escapes, no directives.
    Raw,
}

/// A character after escape handling.
#[derive(Clone, Copy, Debug)]
pub(super) struct Scanned {
    pub ch: char,
    /// Produced by an escape sequence; never a delimiter.
    pub escaped: bool,
    pub owner: FrameId,
    pub scan: bool,
}

/// One unit of directive text as written, for raw collection.
///
/// `lead` is an escape or intro character that belongs in front of `ch`
/// when the text is stored. An `intro open` pair is a unit with `ch ==
/// open`, so it nests like a bare open character.
#[derive(Clone, Copy, Debug)]
pub(super) struct Unit {
    pub ch: char,
    pub lead: Option<char>,
    pub escaped: bool,
    pub owner: FrameId,
    pub scan: bool,
}

impl Unit {
    pub fn push_to(&self, text: &mut String) {
        if let Some(lead) = self.lead {
            text.push(lead);
        }
        text.push(self.ch);
    }
}

impl Expander {
    /// Next character in `mode`. Directives met along the way are processed
    /// before this returns.
    pub(super) fn next_char(&mut self, mode: Scan) -> ExpandResult<Option<Scanned>> {
        let chars = self.config.chars;
        loop {
            let Some(raw) = self.frames.read()? else {
                return Ok(None);
            };
            let plain = Scanned {
                ch: raw.ch,
                escaped: false,
                owner: raw.owner,
                scan: raw.scan,
            };
            if !raw.scan || mode == Scan::Raw {
                return Ok(Some(plain));
            }

            if raw.ch == chars.intro && self.frames.peek()? == Some(chars.open) {
                self.frames.read()?;
                self.directive(raw.owner)?;
                continue;
            }

            if raw.ch == chars.escape {
                let escapable = self.frames.peek()?.is_some_and(|next| match mode {
                    Scan::Text => chars.escapes_in_text(next),
                    _ => chars.escapes_in_directive(next),
                });
                if escapable {
                    if let Some(next) = self.frames.read()? {
                        return Ok(Some(Scanned {
                            ch: next.ch,
                            escaped: true,
                            owner: next.owner,
                            scan: next.scan,
                        }));
                    }
                }
            }
            return Ok(Some(plain));
        }
    }

    /// Next unit, either expanded (`raw == false`, escapes resolved and
    /// directives processed) or exactly as written.
    pub(super) fn next_unit(&mut self, raw: bool) -> ExpandResult<Option<Unit>> {
        if !raw {
            return Ok(self.next_char(Scan::Directive)?.map(|s| Unit {
                ch: s.ch,
                lead: None,
                escaped: s.escaped,
                owner: s.owner,
                scan: s.scan,
            }));
        }

        let chars = self.config.chars;
        let Some(first) = self.next_char(Scan::Raw)? else {
            return Ok(None);
        };
        let mut unit = Unit {
            ch: first.ch,
            lead: None,
            escaped: false,
            owner: first.owner,
            scan: first.scan,
        };
        if !first.scan {
            return Ok(Some(unit));
        }

        let next = self.frames.peek()?;
        let paired = if first.ch == chars.intro && next == Some(chars.open) {
            Some(false)
        } else if first.ch == chars.escape && next.is_some_and(|c| chars.escapes_in_directive(c)) {
            Some(true)
        } else {
            None
        };
        if let Some(escaped) = paired {
            if let Some(second) = self.next_char(Scan::Raw)? {
                unit.lead = Some(first.ch);
                unit.ch = second.ch;
                unit.escaped = escaped;
            }
        }
        Ok(Some(unit))
    }

    /// Re-queue a scanned character, with its escape if it had one.
    pub(super) fn push_back(&mut self, scanned: Scanned) {
        let mut chars: SmallVec<[char; 2]> = SmallVec::new();
        if scanned.escaped {
            chars.push(self.config.chars.escape);
        }
        chars.push(scanned.ch);
        self.frames.push_back(&chars, scanned.owner, scanned.scan);
    }

    /// Re-queue a unit exactly as written.
    pub(super) fn push_back_unit(&mut self, unit: Unit) {
        let mut chars: SmallVec<[char; 2]> = SmallVec::new();
        if let Some(lead) = unit.lead {
            chars.push(lead);
        } else if unit.escaped {
            chars.push(self.config.chars.escape);
        }
        chars.push(unit.ch);
        self.frames.push_back(&chars, unit.owner, unit.scan);
    }
}
