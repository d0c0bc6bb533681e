use crate::stream::{InputStream, OutputStream};
use std::fmt;

/// A command name resolved into one of the built-ins or an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Cat,
    Echo,
    Wc,
    Pwd,
    Exit,
    Grep,
    /// Anything else is launched as a process with this program name.
    External(String),
}

impl CommandKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "cat" => Self::Cat,
            "echo" => Self::Echo,
            "wc" => Self::Wc,
            "pwd" => Self::Pwd,
            "exit" => Self::Exit,
            "grep" => Self::Grep,
            other => Self::External(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Cat => "cat",
            Self::Echo => "echo",
            Self::Wc => "wc",
            Self::Pwd => "pwd",
            Self::Exit => "exit",
            Self::Grep => "grep",
            Self::External(name) => name,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs one pipeline stage.
///
/// The executor reads the previous stage's output from `input`, appends its own output
/// to `output` and any failures to `errors`. Failures never escape as values: a stage
/// always completes from the pipeline's point of view.
pub trait CommandExecutor {
    fn execute(
        &mut self,
        command: &CommandKind,
        args: &[String],
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
    );
}

#[cfg(test)]
mod tests {
    use super::CommandKind;

    #[test]
    fn test_builtin_names_are_recognized() {
        for name in ["cat", "echo", "wc", "pwd", "exit", "grep"] {
            let kind = CommandKind::from_name(name);
            assert!(!matches!(kind, CommandKind::External(_)));
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn test_unknown_names_are_external() {
        assert_eq!(
            CommandKind::from_name("ls"),
            CommandKind::External("ls".to_string())
        );
        assert_eq!(
            CommandKind::from_name("Echo"),
            CommandKind::External("Echo".to_string())
        );
    }
}
