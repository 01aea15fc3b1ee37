//! Stemple expansion engine.
//!
//! Expands `$(...)` directives embedded in arbitrary text:
//!
//! - macro invocation with positional arguments (`$(list a,b)`, `$(1)`)
//! - eager and deferred assignment (`$(A:=...)`, `$(A=...)`, `+=`, `:+=`)
//! - builtins (`env`, `include`, `equal`, `notequal`, `match`, `and`, `or`,
//!   `not`, `defined`)
//! - inline and block conditionals (`if`, `elseif`, `else`, `endif`)
//!
//! Lines that hold nothing but non-printing directives are dropped from the
//! output, so templates can be laid out one directive per line.
//!
//! # Architecture
//!
//! Input is read through a stack of frames (`frame_stack`), one per pending
//! source: the input itself, macro bodies, arguments, builtin results,
//! included files. The [`Expander`] pulls characters off the top, handling
//! directives in the reader, and feeds the rest to the line shaper.
//!
//! ```text
//! let mut expander = Expander::new();
//! expander.set_macro("who", "world", false)?;
//! assert_eq!(expander.expand("hello $(who)")?, "hello world");
//! ```

mod builtins;
mod chars;
mod conditional;
mod config;
mod error;
mod expander;
mod frame;
mod frame_stack;
mod macros;
mod mods;
mod position;
mod shaper;
mod source;

pub use builtins::{is_truthy, Builtin};
pub use chars::{SpecialChars, MODIFIER};
pub use config::{ExpandConfig, DEFAULT_CALL_BUDGET, DEFAULT_MAX_DEPTH};
pub use error::{ExpandError, ExpandResult};
pub use expander::Expander;
pub use mods::Mods;
pub use position::Position;
