//! Command-line argument parsing.

use std::path::PathBuf;
use std::slice;

use stemple_expand::SpecialChars;

use crate::CliError;

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Expand(Options),
}

/// Where input comes from or output goes to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Endpoint {
    /// Standard input or output (`-` or omitted).
    #[default]
    Std,
    Path(PathBuf),
}

impl Endpoint {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Endpoint::Std
        } else {
            Endpoint::Path(PathBuf::from(arg))
        }
    }
}

/// A macro defined on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub body: String,
    /// `-s`: expand the body once at definition time.
    pub eager: bool,
}

impl Define {
    /// Split `name[=body]`. A bare name defines an empty macro.
    fn parse(text: &str, eager: bool) -> Result<Self, CliError> {
        let (name, body) = text.split_once('=').unwrap_or((text, ""));
        if name.is_empty() {
            return Err(CliError::EmptyMacroName(text.to_string()));
        }
        Ok(Define {
            name: name.to_string(),
            body: body.to_string(),
            eager,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub defines: Vec<Define>,
    pub chars: Option<SpecialChars>,
    pub max_depth: Option<usize>,
    pub input: Endpoint,
    pub output: Endpoint,
}

/// Parse arguments, excluding the program name.
///
/// Long options take their value either inline (`--define=A=1`) or as the
/// next argument; short options only as the next argument. `--` ends option
/// processing.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    let mut rest = args.iter();
    let mut options_done = false;

    while let Some(arg) = rest.next() {
        if options_done || arg == "-" || !arg.starts_with('-') {
            positional.push(arg.as_str());
            continue;
        }
        if arg == "--" {
            options_done = true;
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (arg.as_str(), None),
        };
        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "-d" | "--define" => {
                let text = value(flag, inline, &mut rest)?;
                options.defines.push(Define::parse(text, false)?);
            }
            "-s" | "--simple" => {
                let text = value(flag, inline, &mut rest)?;
                options.defines.push(Define::parse(text, true)?);
            }
            "-c" | "--chars" => {
                let text = value(flag, inline, &mut rest)?;
                options.chars = Some(SpecialChars::parse(text).map_err(CliError::Chars)?);
            }
            "--max-depth" => {
                let depth = value(flag, inline, &mut rest)?;
                let parsed = depth.parse().map_err(|_| CliError::InvalidNumber {
                    option: flag.to_string(),
                    value: depth.to_string(),
                })?;
                options.max_depth = Some(parsed);
            }
            _ => return Err(CliError::UnknownOption(arg.clone())),
        }
    }

    let mut positional = positional.into_iter();
    if let Some(input) = positional.next() {
        options.input = Endpoint::from_arg(input);
    }
    if let Some(output) = positional.next() {
        options.output = Endpoint::from_arg(output);
    }
    if let Some(extra) = positional.next() {
        return Err(CliError::UnexpectedArgument(extra.to_string()));
    }
    Ok(Command::Expand(options))
}

fn value<'a>(
    flag: &str,
    inline: Option<&'a str>,
    rest: &mut slice::Iter<'a, String>,
) -> Result<&'a str, CliError> {
    match inline {
        Some(value) => Ok(value),
        None => rest
            .next()
            .map(String::as_str)
            .ok_or_else(|| CliError::MissingValue {
                option: flag.to_string(),
            }),
    }
}
