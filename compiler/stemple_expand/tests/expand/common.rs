//! Shared helpers for expansion tests.

use stemple_expand::Expander;

/// An expander with the given deferred macros defined.
pub fn with_macros(macros: &[(&str, &str)]) -> Expander {
    let mut expander = Expander::new();
    for (name, body) in macros {
        expander.set_macro(name, body, false).unwrap();
    }
    expander
}

/// Expand `input` with a fresh expander holding `macros`.
pub fn expand_with(macros: &[(&str, &str)], input: &str) -> String {
    with_macros(macros).expand(input).unwrap()
}

pub fn expand(input: &str) -> String {
    expand_with(&[], input)
}
