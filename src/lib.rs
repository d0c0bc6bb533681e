//! A small line-oriented shell.
//!
//! An input line is split into words, quotes are resolved, `$name` references are
//! substituted from the shell variables and the resulting pipeline is run stage by
//! stage. Each stage reads the output of the previous one. `cat`, `echo`, `wc`, `grep`,
//! `pwd` and `exit` are built in; any other command name is launched as a process.
//!
//! The main entry point is [`Interpreter`]. Commands are run through the
//! [`CommandExecutor`] trait, so the pipeline logic can be driven without touching the
//! file system or spawning processes.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod executor;
mod external;
mod interpreter;
pub mod lexer;
pub mod quotes;
pub mod reader;
pub mod stream;
pub mod substitution;

pub use command::{CommandExecutor, CommandKind};
pub use error::{CommandError, ParseError};
pub use executor::ShellExecutor;
pub use interpreter::{Interpreter, write_result};
