//! Directive modifiers (`$(name:n:i ...)`).

use bitflags::bitflags;

bitflags! {
    /// Flags scoped to a single directive.
    ///
    /// The empty set is the default behavior: arguments are trimmed,
    /// comparisons are case-sensitive, arguments are expanded while they are
    /// collected and substituted text is scanned.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Mods: u8 {
        /// `n`: keep leading and trailing whitespace of arguments.
        const NO_TRIM = 1 << 0;
        /// `i`: case-insensitive `equal`, `notequal` and `match`.
        const IGNORE_CASE = 1 << 1;
        /// `x`: collect arguments raw; they expand when referenced.
        const NO_EXPAND = 1 << 2;
        /// `q`: substitute the macro body or argument literally.
        const QUOTE = 1 << 3;
    }
}

impl Mods {
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'n' => Some(Mods::NO_TRIM),
            'i' => Some(Mods::IGNORE_CASE),
            'x' => Some(Mods::NO_EXPAND),
            'q' => Some(Mods::QUOTE),
            _ => None,
        }
    }

    /// Parse a run of modifier letters. `None` if any letter is unknown.
    pub fn parse(word: &str) -> Option<Self> {
        word.chars()
            .try_fold(Mods::empty(), |mods, c| Some(mods | Mods::from_letter(c)?))
    }
}
