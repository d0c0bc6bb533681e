use crate::builtin::{Cat, Echo, Exit, Grep, Pwd, Wc, run_builtin};
use crate::command::{CommandExecutor, CommandKind};
use crate::external::ExternalCommand;
use crate::stream::{InputStream, OutputStream};
use std::path::{Path, PathBuf};

/// Executor that runs the built-in commands in-process and everything else as a child
/// process. File arguments and child processes are relative to `current_dir`.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    current_dir: PathBuf,
}

impl ShellExecutor {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }
}

impl Default for ShellExecutor {
    /// Uses the working directory of the process.
    fn default() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(current_dir)
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(
        &mut self,
        command: &CommandKind,
        args: &[String],
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
    ) {
        let cwd = self.current_dir.as_path();
        match command {
            CommandKind::Cat => run_builtin::<Cat>(args, input, output, errors, cwd),
            CommandKind::Echo => run_builtin::<Echo>(args, input, output, errors, cwd),
            CommandKind::Wc => run_builtin::<Wc>(args, input, output, errors, cwd),
            CommandKind::Pwd => run_builtin::<Pwd>(args, input, output, errors, cwd),
            CommandKind::Exit => run_builtin::<Exit>(args, input, output, errors, cwd),
            CommandKind::Grep => run_builtin::<Grep>(args, input, output, errors, cwd),
            CommandKind::External(name) => {
                ExternalCommand::new(name.as_str(), args.to_vec()).execute(input, output, errors, cwd)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute(command: CommandKind, args: &[&str], input: Vec<String>) -> (Vec<String>, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = ShellExecutor::new(dir.path());
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut output = OutputStream::new();
        let mut errors = OutputStream::new();
        executor.execute(&command, &args, InputStream::new(input), &mut output, &mut errors);
        (output.drain(), errors.drain())
    }

    #[test]
    fn test_dispatches_builtins() {
        let (output, errors) = execute(CommandKind::Echo, &["hello", "world"], Vec::new());
        assert_eq!(output, vec!["hello world\n"]);
        assert!(errors.is_empty());

        let (output, _) = execute(CommandKind::Wc, &[], vec!["a b c\n".to_string()]);
        assert_eq!(output, vec!["1 3 6\n"]);
    }

    #[test]
    fn test_relative_files_use_current_dir() {
        let (output, errors) = execute(CommandKind::Cat, &["missing.txt"], Vec::new());
        assert!(output.is_empty());
        assert_eq!(errors, vec!["cat: missing.txt: No such file or directory"]);
    }

    #[test]
    fn test_pwd_reports_current_dir() {
        let executor = ShellExecutor::new("/tmp/somewhere");
        assert_eq!(executor.current_dir(), Path::new("/tmp/somewhere"));

        let mut executor = executor;
        let mut output = OutputStream::new();
        let mut errors = OutputStream::new();
        executor.execute(&CommandKind::Pwd, &[], InputStream::default(), &mut output, &mut errors);
        assert_eq!(output.lines(), ["/tmp/somewhere\n"]);
    }
}
