//! Builtin directive names and the pure helpers they share.
//!
//! Dispatch lives in the expander (`expander/dispatch.rs`); this module only
//! knows names, arities and the truthiness rule.

/// Every directive name the expander handles itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Env,
    Include,
    Equal,
    NotEqual,
    Match,
    And,
    Or,
    Not,
    Defined,
    If,
    ElseIf,
    Else,
    EndIf,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Env,
        Builtin::Include,
        Builtin::Equal,
        Builtin::NotEqual,
        Builtin::Match,
        Builtin::And,
        Builtin::Or,
        Builtin::Not,
        Builtin::Defined,
        Builtin::If,
        Builtin::ElseIf,
        Builtin::Else,
        Builtin::EndIf,
    ];

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "env" => Builtin::Env,
            "include" => Builtin::Include,
            "equal" => Builtin::Equal,
            "notequal" => Builtin::NotEqual,
            "match" => Builtin::Match,
            "and" => Builtin::And,
            "or" => Builtin::Or,
            "not" => Builtin::Not,
            "defined" => Builtin::Defined,
            "if" => Builtin::If,
            "elseif" => Builtin::ElseIf,
            "else" => Builtin::Else,
            "endif" => Builtin::EndIf,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Env => "env",
            Builtin::Include => "include",
            Builtin::Equal => "equal",
            Builtin::NotEqual => "notequal",
            Builtin::Match => "match",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Not => "not",
            Builtin::Defined => "defined",
            Builtin::If => "if",
            Builtin::ElseIf => "elseif",
            Builtin::Else => "else",
            Builtin::EndIf => "endif",
        }
    }

    /// Conditionals run even inside a skipped branch.
    #[inline]
    pub fn is_conditional(self) -> bool {
        matches!(
            self,
            Builtin::If | Builtin::ElseIf | Builtin::Else | Builtin::EndIf
        )
    }

    /// Fewest arguments the builtin accepts.
    pub fn min_args(self) -> usize {
        match self {
            Builtin::Env | Builtin::Include | Builtin::Not | Builtin::Defined => 1,
            Builtin::Equal | Builtin::NotEqual | Builtin::Match | Builtin::And | Builtin::Or => 2,
            Builtin::If | Builtin::ElseIf | Builtin::Else | Builtin::EndIf => 0,
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `""`, `"0"`, `"false"` and `"no"` (any ASCII case) are false.
pub fn is_truthy(text: &str) -> bool {
    !(text.is_empty()
        || text == "0"
        || text.eq_ignore_ascii_case("false")
        || text.eq_ignore_ascii_case("no"))
}

pub(crate) fn text_eq(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

pub(crate) fn bool_text(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
