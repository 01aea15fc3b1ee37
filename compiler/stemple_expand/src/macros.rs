//! Macro storage.

use rustc_hash::FxHashMap;

/// A named macro body.
///
/// Eager macros hold text that was fully expanded when assigned and is
/// emitted verbatim on every invocation. Deferred macros hold raw text that
/// is expanded afresh each time they are invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Macro {
    body: String,
    eager: bool,
}

impl Macro {
    pub fn new(body: impl Into<String>, eager: bool) -> Self {
        Macro {
            body: body.into(),
            eager,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    #[inline]
    pub fn is_eager(&self) -> bool {
        self.eager
    }
}

/// Macro table keyed by name. Entries are only ever replaced, never removed.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    macros: FxHashMap<String, Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        MacroTable::default()
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Create or overwrite `name`.
    pub fn define(&mut self, name: &str, body: String, eager: bool) {
        self.macros.insert(name.to_string(), Macro::new(body, eager));
    }

    /// Concatenate `text` onto `name`, defining it if absent.
    ///
    /// A deferred append (`eager == false`) makes the whole body deferred so
    /// the appended raw text is expanded on invocation. An eager append
    /// carries already expanded text and leaves the existing mode alone.
    pub fn append(&mut self, name: &str, text: &str, eager: bool) {
        match self.macros.get_mut(name) {
            Some(existing) => {
                existing.body.push_str(text);
                if !eager {
                    existing.eager = false;
                }
            }
            None => self.define(name, text.to_string(), eager),
        }
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
