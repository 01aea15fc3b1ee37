use std::io;
use std::path::PathBuf;

use stemple_expand::ExpandError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("option '{option}' requires a value")]
    MissingValue { option: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for '{option}'")]
    InvalidNumber { option: String, value: String },

    #[error("missing macro name in '{0}'")]
    EmptyMacroName(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    /// Rejected `-c` value.
    #[error("{0}")]
    Chars(#[source] ExpandError),

    #[error("cannot create '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Create { .. } | CliError::Expand(_) => 2,
            _ => 1,
        }
    }
}
