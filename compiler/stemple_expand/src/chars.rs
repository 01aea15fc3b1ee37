//! Syntax characters and ASCII character classes.
//!
//! All predicates here are ASCII-only and locale independent.

use crate::{ExpandError, ExpandResult};

/// Separates a directive name from its modifier letters (`$(A:n ...)`).
pub const MODIFIER: char = ':';

/// The five configurable characters of the directive syntax.
///
/// Only [`new`](SpecialChars::new), [`parse`](SpecialChars::parse) and
/// `Default` construct one, so every value in circulation is valid.
///
/// The escape and intro characters may coincide (they do by default), which
/// is why `$$` is the literal-dollar escape in the default configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialChars {
    pub(crate) escape: char,
    pub(crate) intro: char,
    pub(crate) open: char,
    pub(crate) arg_sep: char,
    pub(crate) close: char,
}

impl Default for SpecialChars {
    fn default() -> Self {
        SpecialChars {
            escape: '$',
            intro: '$',
            open: '(',
            arg_sep: ',',
            close: ')',
        }
    }
}

impl SpecialChars {
    /// Build a validated character set.
    pub fn new(
        escape: char,
        intro: char,
        open: char,
        arg_sep: char,
        close: char,
    ) -> ExpandResult<Self> {
        let chars = SpecialChars {
            escape,
            intro,
            open,
            arg_sep,
            close,
        };
        chars.validate()?;
        Ok(chars)
    }

    /// Parse the five characters in order: escape, intro, open, separator,
    /// close (the CLI's `-c` format, e.g. `"\\%{;}"`).
    pub fn parse(text: &str) -> ExpandResult<Self> {
        let chars: Vec<char> = text.chars().collect();
        match chars.as_slice() {
            &[escape, intro, open, arg_sep, close] => {
                SpecialChars::new(escape, intro, open, arg_sep, close)
            }
            _ => Err(ExpandError::InvalidSpecialChars {
                chars: text.to_string(),
                reason: "expected exactly five characters",
            }),
        }
    }

    fn validate(&self) -> ExpandResult<()> {
        let structural = [self.intro, self.open, self.arg_sep, self.close];
        let fail = |reason| {
            Err(ExpandError::InvalidSpecialChars {
                chars: self.to_string(),
                reason,
            })
        };

        if std::iter::once(self.escape)
            .chain(structural)
            .any(is_space)
        {
            return fail("whitespace cannot be a special character");
        }
        for (i, a) in structural.iter().enumerate() {
            if structural[i + 1..].contains(a) {
                return fail("intro, open, separator and close must be distinct");
            }
        }
        if self.escape != self.intro && structural.contains(&self.escape) {
            return fail("escape may only coincide with the intro character");
        }
        Ok(())
    }

    #[inline]
    pub fn escape(&self) -> char {
        self.escape
    }

    #[inline]
    pub fn intro(&self) -> char {
        self.intro
    }

    #[inline]
    pub fn open(&self) -> char {
        self.open
    }

    #[inline]
    pub fn arg_sep(&self) -> char {
        self.arg_sep
    }

    #[inline]
    pub fn close(&self) -> char {
        self.close
    }

    /// Terminates a directive name.
    #[inline]
    pub(crate) fn ends_name(&self, c: char) -> bool {
        is_space(c) || c == MODIFIER || c == '+' || c == '=' || c == self.close
    }

    /// Characters the escape character makes literal in ordinary text.
    #[inline]
    pub(crate) fn escapes_in_text(&self, c: char) -> bool {
        c == self.escape || c == self.intro || c == '\n'
    }

    /// Characters the escape character makes literal inside a directive.
    #[inline]
    pub(crate) fn escapes_in_directive(&self, c: char) -> bool {
        self.escapes_in_text(c)
            || c == self.open
            || c == self.close
            || c == self.arg_sep
            || c == MODIFIER
            || c == '+'
            || c == '='
            || is_blank(c)
    }
}

impl std::fmt::Display for SpecialChars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.escape, self.intro, self.open, self.arg_sep, self.close
        )
    }
}

/// Space or tab.
#[inline]
pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// ASCII whitespace, including line terminators.
#[inline]
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
