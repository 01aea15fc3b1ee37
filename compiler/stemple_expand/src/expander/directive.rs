//! Directive parsing and resolution.
//!
//! Entered from `next_char` right after `intro open` has been consumed.
//! The parser reads through the same scanner as ordinary text, so
//! directives inside names and arguments expand while the outer directive
//! is being collected.
//!
//! Nothing in here fails on bad syntax. A directive that cannot be parsed
//! is skipped up to its matching close and expands to nothing; only I/O
//! errors and the recursion guards propagate.

use stemple_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use super::scan::{Scan, Scanned, Unit};
use super::Expander;
use crate::builtins::Builtin;
use crate::chars::{is_space, MODIFIER};
use crate::frame::{Frame, FrameId};
use crate::source::CharSource;
use crate::{ExpandResult, Mods};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    /// Whitespace followed by the first argument.
    Args,
    Assign(AssignOp),
    /// `:` not followed by an assignment operator.
    Mod,
    Close,
    Err,
    /// Input ended inside the directive.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Append,
    /// `:=`
    SimpleAssign,
    /// `:+=`
    SimpleAppend,
}

impl AssignOp {
    fn is_eager(self) -> bool {
        matches!(self, AssignOp::SimpleAssign | AssignOp::SimpleAppend)
    }

    fn is_append(self) -> bool {
        matches!(self, AssignOp::Append | AssignOp::SimpleAppend)
    }
}

/// Everything after the directive name.
#[derive(Debug)]
enum Tail {
    Invoke { mods: Mods, args: Vec<String> },
    Assign { op: AssignOp, text: String },
    Invalid,
    Unterminated,
}

/// How a directive resolved, as far as line shaping cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Outcome {
    /// Pushed replacement text.
    Printed,
    /// Recognized, but produced nothing.
    Silent,
    Unrecognized,
    /// Block conditional.
    Control,
    /// Suppressed by an enclosing false branch.
    Skipped,
}

impl Expander {
    /// Process one directive whose `intro open` has just been read.
    pub(super) fn directive(&mut self, owner: FrameId) -> ExpandResult<()> {
        self.enter_nesting()?;
        let scope = self.frames.scope_of(owner);
        let outer = std::mem::replace(&mut self.scope, scope);
        let result = ensure_sufficient_stack(|| self.process_directive(owner));
        self.scope = outer;
        self.depth.exit();
        result
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn process_directive(&mut self, owner: FrameId) -> ExpandResult<()> {
        let skipping = self.conds.is_skipping();
        let name = self.collect_name()?;

        // An elseif that may still select its branch evaluates its
        // condition even though its chain is currently skipping.
        let tail = if name == Builtin::ElseIf.name() && self.conds.elseif_pending() {
            let saved = self.conds.suspend_skip();
            let tail = self.parse_tail();
            self.conds.resume_skip(saved);
            tail?
        } else {
            self.parse_tail()?
        };

        let outcome = match tail {
            Tail::Invoke { mods, args } => self.invoke(&name, mods, args)?,
            Tail::Assign { op, text } => self.assign(&name, op, text)?,
            Tail::Invalid => {
                self.resync()?;
                if skipping {
                    Outcome::Skipped
                } else {
                    debug!(name = %name, location = %self.frames.location(), "malformed directive");
                    Outcome::Unrecognized
                }
            }
            Tail::Unterminated => {
                if skipping {
                    Outcome::Skipped
                } else {
                    debug!(name = %name, "directive unterminated at end of input");
                    Outcome::Unrecognized
                }
            }
        };

        trace!(name = %name, ?outcome);
        if !matches!(outcome, Outcome::Printed | Outcome::Skipped) {
            self.frames.mark_directive(owner);
        }
        Ok(())
    }

    /// The directive name, up to the first unescaped name terminator. The
    /// terminator is left in the stream.
    fn collect_name(&mut self) -> ExpandResult<String> {
        let chars = self.config.chars;
        let mut name = String::new();
        while let Some(scanned) = self.next_char(Scan::Directive)? {
            if !scanned.escaped && chars.ends_name(scanned.ch) {
                self.push_back(scanned);
                break;
            }
            name.push(scanned.ch);
        }
        Ok(name)
    }

    fn parse_tail(&mut self) -> ExpandResult<Tail> {
        let mut mods = Mods::empty();
        loop {
            let tail = match self.token(mods)? {
                Token::Mod => match self.collect_mods()? {
                    Some(more) => {
                        mods |= more;
                        continue;
                    }
                    None => Tail::Invalid,
                },
                Token::Close => Tail::Invoke {
                    mods,
                    args: Vec::new(),
                },
                Token::Args => {
                    let args = self.collect_args(mods)?;
                    match self.token(mods)? {
                        Token::Close => Tail::Invoke { mods, args },
                        Token::End => Tail::Unterminated,
                        _ => Tail::Invalid,
                    }
                }
                Token::Assign(op) => match self.collect_text()? {
                    Some(text) => Tail::Assign { op, text },
                    None => Tail::Unterminated,
                },
                Token::Err => Tail::Invalid,
                Token::End => Tail::Unterminated,
            };
            return Ok(tail);
        }
    }

    fn token(&mut self, mods: Mods) -> ExpandResult<Token> {
        let mode = if mods.contains(Mods::NO_EXPAND) {
            Scan::Raw
        } else {
            Scan::Directive
        };
        let close = self.config.chars.close;
        let mut blanks = String::new();

        loop {
            let Some(scanned) = self.next_char(mode)? else {
                return Ok(Token::End);
            };
            if scanned.escaped {
                return Ok(self.args_or_err(&blanks, scanned));
            }
            match scanned.ch {
                c if is_space(c) => blanks.push(c),
                MODIFIER => return self.after_modifier(mode),
                '+' => return self.after_plus(mode),
                '=' => return Ok(Token::Assign(AssignOp::Assign)),
                c if c == close => return Ok(Token::Close),
                _ => return Ok(self.args_or_err(&blanks, scanned)),
            }
        }
    }

    /// A character that starts no operator: the first argument if
    /// whitespace came before it, otherwise an error. Either way it goes
    /// back to the stream, preceded by any whitespace beyond the first
    /// separator so `n` can keep it.
    fn args_or_err(&mut self, blanks: &str, scanned: Scanned) -> Token {
        if blanks.is_empty() {
            self.push_back(scanned);
            return Token::Err;
        }
        let extra: String = blanks.chars().skip(1).collect();
        if extra.is_empty() {
            self.push_back(scanned);
        } else {
            let mut text: Vec<char> = extra.chars().collect();
            if scanned.escaped {
                text.push(self.config.chars.escape);
            }
            text.push(scanned.ch);
            self.frames.push_back(&text, scanned.owner, scanned.scan);
        }
        Token::Args
    }

    fn after_modifier(&mut self, mode: Scan) -> ExpandResult<Token> {
        let Some(next) = self.next_char(mode)? else {
            return Ok(Token::Mod);
        };
        if next.escaped {
            self.push_back(next);
            return Ok(Token::Mod);
        }
        match next.ch {
            '=' => Ok(Token::Assign(AssignOp::SimpleAssign)),
            '+' => match self.next_char(mode)? {
                Some(eq) if eq.ch == '=' && !eq.escaped => {
                    Ok(Token::Assign(AssignOp::SimpleAppend))
                }
                Some(other) => {
                    self.push_back(other);
                    Ok(Token::Err)
                }
                None => Ok(Token::End),
            },
            _ => {
                self.push_back(next);
                Ok(Token::Mod)
            }
        }
    }

    fn after_plus(&mut self, mode: Scan) -> ExpandResult<Token> {
        match self.next_char(mode)? {
            Some(eq) if eq.ch == '=' && !eq.escaped => Ok(Token::Assign(AssignOp::Append)),
            Some(other) => {
                self.push_back(other);
                Ok(Token::Err)
            }
            None => Ok(Token::End),
        }
    }

    /// Modifier word after `:`. `None` if it holds an unknown letter or is
    /// not followed by a name terminator.
    fn collect_mods(&mut self) -> ExpandResult<Option<Mods>> {
        let chars = self.config.chars;
        let mut word = String::new();
        let mut terminated = true;
        while let Some(scanned) = self.next_char(Scan::Raw)? {
            if scanned.ch.is_ascii_alphabetic() {
                word.push(scanned.ch);
                continue;
            }
            self.push_back(scanned);
            terminated = chars.ends_name(scanned.ch);
            break;
        }
        let mods = Mods::parse(&word).filter(|_| terminated);
        if mods.is_none() {
            debug!(word = %word, "unknown modifier");
        }
        Ok(mods)
    }

    /// Separator-delimited arguments. Open and close characters nest; the
    /// close that ends the list is left in the stream.
    fn collect_args(&mut self, mods: Mods) -> ExpandResult<Vec<String>> {
        let chars = self.config.chars;
        let raw = mods.contains(Mods::NO_EXPAND);
        let trim = !mods.contains(Mods::NO_TRIM);

        let mut args = Vec::new();
        let mut arg: Vec<(char, bool)> = Vec::new();
        let mut depth = 0usize;

        while let Some(unit) = self.next_unit(raw)? {
            if !unit.escaped {
                if unit.ch == chars.close && depth == 0 {
                    self.push_back_unit(unit);
                    break;
                }
                if unit.ch == chars.arg_sep && depth == 0 {
                    args.push(finish_arg(&arg, trim));
                    arg.clear();
                    continue;
                }
                if unit.ch == chars.open {
                    depth += 1;
                } else if unit.ch == chars.close {
                    depth -= 1;
                }
            }
            push_unit(&mut arg, &unit);
        }
        args.push(finish_arg(&arg, trim));
        Ok(args)
    }

    /// Assignment text, raw, up to and including the matching close. `None`
    /// if the input ends first.
    fn collect_text(&mut self) -> ExpandResult<Option<String>> {
        let chars = self.config.chars;
        let mut text = String::new();
        let mut depth = 0usize;
        while let Some(unit) = self.next_unit(true)? {
            if !unit.escaped {
                if unit.ch == chars.close {
                    if depth == 0 {
                        return Ok(Some(text));
                    }
                    depth -= 1;
                } else if unit.ch == chars.open {
                    depth += 1;
                }
            }
            unit.push_to(&mut text);
        }
        Ok(None)
    }

    /// Skip the rest of a malformed directive, through its matching close.
    fn resync(&mut self) -> ExpandResult<()> {
        let chars = self.config.chars;
        let mut depth = 0usize;
        while let Some(unit) = self.next_unit(true)? {
            if unit.escaped {
                continue;
            }
            if unit.ch == chars.close {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if unit.ch == chars.open {
                depth += 1;
            }
        }
        Ok(())
    }

    fn invoke(&mut self, name: &str, mods: Mods, args: Vec<String>) -> ExpandResult<Outcome> {
        let builtin = Builtin::from_name(name);
        if self.conds.is_skipping() && !builtin.is_some_and(Builtin::is_conditional) {
            return Ok(Outcome::Skipped);
        }
        if let Some(builtin) = builtin {
            return self.builtin(builtin, mods, args);
        }
        if name.is_empty() {
            debug!("empty directive name");
            return Ok(Outcome::Unrecognized);
        }
        if name.bytes().all(|b| b.is_ascii_digit()) {
            return self.positional(name, mods);
        }
        self.call_macro(name, mods, args)
    }

    /// `$(1)`, `$(2)`, ...: an argument of the innermost invocation the
    /// directive was read under.
    fn positional(&mut self, name: &str, mods: Mods) -> ExpandResult<Outcome> {
        let index = name.parse::<usize>().unwrap_or(0);
        let Some(scope) = self.scope.clone() else {
            debug!(index = name, "positional reference outside any invocation");
            return Ok(Outcome::Unrecognized);
        };
        let Some(text) = scope.arg(index) else {
            debug!(index, available = scope.arg_count(), "argument out of range");
            return Ok(Outcome::Unrecognized);
        };
        if text.is_empty() {
            return Ok(Outcome::Silent);
        }
        let origin = format!("{}, arg {index}", scope.origin());
        self.count_call()?;
        self.push_text(origin, text, !mods.contains(Mods::QUOTE));
        Ok(Outcome::Printed)
    }

    fn call_macro(&mut self, name: &str, mods: Mods, args: Vec<String>) -> ExpandResult<Outcome> {
        let Some(found) = self.macros.get(name) else {
            debug!(name, "undefined macro");
            return Ok(Outcome::Unrecognized);
        };
        if found.body().is_empty() {
            return Ok(Outcome::Silent);
        }
        let body = found.body().to_string();
        let scan = !found.is_eager() && !mods.contains(Mods::QUOTE);

        self.count_call()?;
        let origin = format!("body of {name}");
        let scope = self.scope_for(&origin, args);
        let id = self.frames.next_id();
        let frame = Frame::new(id, origin, CharSource::text(&body))
            .with_scope(scope)
            .with_scan(scan);
        self.frames.push(frame);
        Ok(Outcome::Printed)
    }

    fn assign(&mut self, name: &str, op: AssignOp, text: String) -> ExpandResult<Outcome> {
        if self.conds.is_skipping() {
            return Ok(Outcome::Skipped);
        }
        if name.is_empty() {
            debug!("assignment without a name");
            return Ok(Outcome::Unrecognized);
        }
        let eager = op.is_eager();
        let value = if eager {
            self.expand_nested(&text, name)?
        } else {
            text
        };
        trace!(name, ?op, value = %value, "assign");
        if op.is_append() {
            self.macros.append(name, &value, eager);
        } else {
            self.macros.define(name, value, eager);
        }
        Ok(Outcome::Silent)
    }
}

fn push_unit(arg: &mut Vec<(char, bool)>, unit: &Unit) {
    if let Some(lead) = unit.lead {
        arg.push((lead, true));
    }
    arg.push((unit.ch, unit.escaped || unit.lead.is_some()));
}

/// Join an argument, trimming unprotected whitespace from both ends.
/// Escaped characters are protected.
fn finish_arg(arg: &[(char, bool)], trim: bool) -> String {
    let keeps = |&(c, protected): &(char, bool)| protected || !is_space(c);
    let (start, end) = if trim {
        let start = arg.iter().position(keeps).unwrap_or(arg.len());
        let end = arg.iter().rposition(keeps).map_or(start, |i| i + 1);
        (start, end)
    } else {
        (0, arg.len())
    };
    arg[start..end].iter().map(|&(c, _)| c).collect()
}
