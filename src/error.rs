use std::io;
use thiserror::Error;

/// Errors that abort the processing of an input line.
///
/// Each variant renders as the single line that is appended to the error stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A quote character was opened and never closed.
    #[error("mismatched quotes")]
    MismatchedQuotes,
    /// A `|` with no command on one of its sides, e.g. `echo text |`.
    #[error("syntax error near unexpected token `|'")]
    MissingCommand,
    /// An assignment like `x=` with nothing to assign.
    #[error("{0}: missing value in assignment")]
    MissingAssignmentValue(String),
    /// Command name substitution kept producing new names.
    #[error("{0}: command name substitution does not terminate")]
    UnresolvedCommandName(String),
}

/// Failures local to a single command of a pipeline.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command}: {path}: No such file or directory")]
    NotFound { command: &'static str, path: String },
    #[error("{command}: {path}: Is a directory")]
    IsDirectory { command: &'static str, path: String },
    #[error("{command}: {path}: {source}")]
    Unreadable {
        command: &'static str,
        path: String,
        source: io::Error,
    },
    #[error("{0}: Incorrect arguments")]
    IncorrectArguments(&'static str),
}
