//! Builtin directive dispatch.

use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use tracing::{debug, trace, warn};

use super::directive::Outcome;
use super::Expander;
use crate::builtins::{bool_text, is_truthy, text_eq, Builtin};
use crate::frame::Frame;
use crate::{ExpandResult, Mods};

impl Expander {
    pub(super) fn builtin(
        &mut self,
        builtin: Builtin,
        mods: Mods,
        args: Vec<String>,
    ) -> ExpandResult<Outcome> {
        if args.len() < builtin.min_args() {
            debug!(%builtin, given = args.len(), "too few arguments");
            self.push_bool(builtin, false);
            return Ok(Outcome::Unrecognized);
        }
        let ignore_case = mods.contains(Mods::IGNORE_CASE);

        let outcome = match builtin {
            Builtin::Env => match std::env::var(&args[0]) {
                Ok(value) if !value.is_empty() => {
                    self.push_text(format!("env {}", args[0]), &value, !mods.contains(Mods::QUOTE));
                    Outcome::Printed
                }
                _ => Outcome::Silent,
            },
            Builtin::Include => self.include(&args, mods),
            Builtin::Equal => {
                self.push_bool(builtin, text_eq(&args[0], &args[1], ignore_case));
                Outcome::Printed
            }
            Builtin::NotEqual => {
                self.push_bool(builtin, !text_eq(&args[0], &args[1], ignore_case));
                Outcome::Printed
            }
            Builtin::Match => {
                let found = match RegexBuilder::new(&args[1])
                    .case_insensitive(ignore_case)
                    .build()
                {
                    Ok(pattern) => pattern.is_match(&args[0]),
                    Err(err) => {
                        warn!(pattern = %args[1], error = %err, "invalid regular expression");
                        false
                    }
                };
                self.push_bool(builtin, found);
                Outcome::Printed
            }
            Builtin::And => {
                self.push_bool(builtin, args.iter().all(|a| is_truthy(a)));
                Outcome::Printed
            }
            Builtin::Or => {
                self.push_bool(builtin, args.iter().any(|a| is_truthy(a)));
                Outcome::Printed
            }
            Builtin::Not => {
                self.push_bool(builtin, !is_truthy(&args[0]));
                Outcome::Printed
            }
            Builtin::Defined => {
                let defined = self.defined(&args[0]);
                self.push_bool(builtin, defined);
                Outcome::Printed
            }
            Builtin::If if args.len() >= 2 => self.inline_if(&args),
            Builtin::If => {
                self.conds.open(args.first().is_some_and(|a| is_truthy(a)));
                Outcome::Control
            }
            Builtin::ElseIf => {
                let cond = args.first().is_some_and(|a| is_truthy(a));
                if let Err(err) = self.conds.elseif_branch(cond) {
                    warn!(location = %self.frames.location(), "elseif ignored: {err}");
                }
                Outcome::Control
            }
            Builtin::Else => {
                if let Err(err) = self.conds.else_branch() {
                    warn!(location = %self.frames.location(), "else ignored: {err}");
                }
                Outcome::Control
            }
            Builtin::EndIf => {
                if let Err(err) = self.conds.end() {
                    warn!(location = %self.frames.location(), "endif ignored: {err}");
                }
                Outcome::Control
            }
        };
        if outcome == Outcome::Control {
            trace!(
                %builtin,
                open = self.conds.depth(),
                skipping = self.conds.skip_depth(),
                "conditional"
            );
        }
        Ok(outcome)
    }

    fn push_bool(&mut self, builtin: Builtin, value: bool) {
        self.push_text(builtin.name().to_string(), bool_text(value), false);
    }

    /// `if(cond, then[, else])`: push the chosen branch.
    fn inline_if(&mut self, args: &[String]) -> Outcome {
        if self.conds.is_skipping() {
            return Outcome::Skipped;
        }
        let branch = if is_truthy(&args[0]) {
            args.get(1)
        } else {
            args.get(2)
        };
        match branch {
            Some(text) if !text.is_empty() => {
                self.push_text("if".to_string(), text, true);
                Outcome::Printed
            }
            _ => Outcome::Silent,
        }
    }

    /// A macro name, or an argument index of the invocation the directive
    /// was read under.
    fn defined(&self, name: &str) -> bool {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            let index = name.parse::<usize>().unwrap_or(0);
            return self
                .scope
                .as_ref()
                .is_some_and(|scope| scope.arg(index).is_some());
        }
        self.macros.contains(name)
    }

    fn include(&mut self, args: &[String], mods: Mods) -> Outcome {
        let path = self.resolve_include(&args[0]);
        let id = self.frames.next_id();
        match Frame::file(id, &path) {
            Ok(frame) => {
                debug!(path = %path.display(), "include");
                let scope = self.scope_for(frame.origin(), args[1..].to_vec());
                let frame = frame
                    .with_scope(scope)
                    .with_scan(!mods.contains(Mods::QUOTE));
                self.frames.push(frame);
                Outcome::Printed
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    location = %self.frames.location(),
                    "cannot include: {err}"
                );
                Outcome::Unrecognized
            }
        }
    }

    /// Relative paths resolve against the directory of the nearest frame
    /// read from a file, or the working directory when there is none.
    fn resolve_include(&self, target: &str) -> PathBuf {
        let target = Path::new(target);
        if target.is_absolute() {
            return target.to_path_buf();
        }
        match self.frames.nearest_path().and_then(Path::parent) {
            Some(dir) => dir.join(target),
            None => target.to_path_buf(),
        }
    }
}
