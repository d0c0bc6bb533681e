use crate::command::{CommandExecutor, CommandKind};
use crate::env::VariableStore;
use crate::error::ParseError;
use crate::executor::ShellExecutor;
use crate::lexer;
use crate::reader::{self, Stage};
use crate::stream::OutputStream;
use crate::substitution::substitute;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::{self, Write};

/// How many substitution passes a command name may take before it is rejected.
const MAX_NAME_RESOLUTION_DEPTH: usize = 32;

/// A minimal shell-like interpreter that runs one line at a time.
///
/// The interpreter owns the shell variables and the output/error buffers shared by
/// the stages of a pipeline. Commands are run by a [`CommandExecutor`]; by default a
/// [`ShellExecutor`] that knows the built-ins and can launch external programs.
///
/// Example
/// ```
/// use line_shell::Interpreter;
/// let mut sh: Interpreter = Interpreter::default();
/// sh.parse_input("x=hello");
/// assert_eq!(sh.parse_input("echo $x | wc"), vec!["1 1 6\n"]);
/// ```
pub struct Interpreter<E = ShellExecutor> {
    vars: VariableStore,
    executor: E,
    output: OutputStream,
    errors: OutputStream,
}

impl<E: CommandExecutor> Interpreter<E> {
    /// Create a new interpreter with a custom executor.
    pub fn new(executor: E) -> Self {
        Self {
            vars: VariableStore::new(),
            executor,
            output: OutputStream::new(),
            errors: OutputStream::new(),
        }
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every stage of one input line.
    ///
    /// Returns the output left by the last stage followed by every error line collected
    /// on the way. A malformed line stops at the offending stage and adds one error line.
    pub fn parse_input(&mut self, line: &str) -> Vec<String> {
        if let Err(e) = self.run_pipeline(line) {
            log::debug!("line aborted: {}", e);
            self.errors.write_line(e.to_string());
        }
        let mut result = self.output.drain();
        result.extend(self.errors.drain());
        result
    }

    fn run_pipeline(&mut self, line: &str) -> std::result::Result<(), ParseError> {
        let words = lexer::tokenize(line)?;

        let mut cursor = 0;
        while cursor < words.len() {
            match reader::read_command(&words, cursor, &mut self.vars)? {
                Stage::Assignment { next } => cursor = next,
                Stage::Command(stage) => {
                    let name = self.resolve_command_name(stage.name)?;
                    let command = CommandKind::from_name(&name);
                    log::debug!("running {} {:?}", command, stage.args);

                    let input = self.output.drain_into_input();
                    self.executor.execute(
                        &command,
                        &stage.args,
                        input,
                        &mut self.output,
                        &mut self.errors,
                    );
                    cursor = stage.next;
                }
            }
        }
        Ok(())
    }

    /// Keep substituting a command name until it no longer changes, so a variable may
    /// name another variable. Bounded to catch cycles like `a='$b'`, `b='$a'`.
    fn resolve_command_name(&self, name: String) -> std::result::Result<String, ParseError> {
        let mut current = name;
        for _ in 0..MAX_NAME_RESOLUTION_DEPTH {
            let next = substitute(&current, |id| self.vars.get(id));
            if next == current {
                return Ok(current);
            }
            current = next;
        }
        log::warn!("command name {:?} did not settle", current);
        Err(ParseError::UnresolvedCommandName(current))
    }

    /// Read-Eval-Print Loop.
    pub fn repl(&mut self, prompt: &str) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let result = self.parse_input(&line);
                    write_result(&mut io::stdout().lock(), &result)?;
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Default for Interpreter<ShellExecutor> {
    /// Interpreter with a [`ShellExecutor`] in the process working directory.
    fn default() -> Self {
        Self::new(ShellExecutor::default())
    }
}

/// Print the lines returned by [`Interpreter::parse_input`].
///
/// Lines that already end with a newline are printed as they are.
pub fn write_result(out: &mut dyn Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        if line.ends_with('\n') {
            out.write_all(line.as_bytes())?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}
