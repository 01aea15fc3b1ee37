//! Command-line driver for the stemple expander.
//!
//! ```text
//! stemple [options] [<input>|- [<output>|-]]
//! ```
//!
//! Macros given with `-d`/`-s` are defined before the input is read, in
//! command-line order. Exit status is 0 on success, 1 for usage errors and
//! 2 when the input cannot be opened or expansion fails.

mod error;
mod logging;
mod options;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use stemple_expand::{ExpandConfig, Expander};
use tracing::debug;

pub use error::CliError;
pub use logging::init_tracing;
pub use options::{parse_args, Command, Define, Endpoint, Options};

/// Expand the configured input into the configured output.
pub fn run(options: &Options) -> Result<(), CliError> {
    let mut config = ExpandConfig::default();
    if let Some(chars) = options.chars {
        config = config.with_chars(chars);
    }
    if let Some(max_depth) = options.max_depth {
        config = config.with_max_depth(Some(max_depth));
    }

    let mut expander = Expander::with_config(config);
    for define in &options.defines {
        debug!(name = %define.name, eager = define.eager, "command-line macro");
        expander.set_macro(&define.name, &define.body, define.eager)?;
    }

    let mut output: Box<dyn Write> = match &options.output {
        Endpoint::Std => Box::new(io::stdout().lock()),
        Endpoint::Path(path) => {
            let file = File::create(path).map_err(|source| CliError::Create {
                path: path.clone(),
                source,
            })?;
            Box::new(BufWriter::new(file))
        }
    };

    match &options.input {
        Endpoint::Std => expander.expand_stream(io::stdin(), "stdin", &mut *output)?,
        Endpoint::Path(path) => expander.expand_file(path, &mut *output)?,
    }
    Ok(())
}
