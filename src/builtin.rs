use crate::error::CommandError;
use crate::stream::{InputStream, OutputStream};
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::Path;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process on the line buffers of the pipeline.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "grep".
    fn name() -> &'static str;

    /// Executes the command.
    ///
    /// Per-argument problems (a missing file among several) are written to `errors` and
    /// do not stop the command. An `Err` return ends the command and becomes one error line.
    fn execute(
        self,
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
        cwd: &Path,
    ) -> Result<()>;
}

/// Parse `args` for the builtin `T` and run it.
pub(crate) fn run_builtin<T: BuiltinCommand>(
    args: &[String],
    input: InputStream,
    output: &mut OutputStream,
    errors: &mut OutputStream,
    cwd: &Path,
) {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[T::name()], &args) {
        Ok(cmd) => {
            if let Err(e) = cmd.execute(input, output, errors, cwd) {
                errors.write_line(format!("{}: {:#}", T::name(), e));
            }
        }
        Err(EarlyExit {
            output: help,
            status: Ok(()),
        }) => output.write_line(help),
        Err(EarlyExit { status: Err(()), .. }) => {
            errors.write_line(CommandError::IncorrectArguments(T::name()).to_string());
        }
    }
}

/// Read a file argument relative to `cwd`, reporting problems the way shell tools do.
fn read_file(command: &'static str, cwd: &Path, arg: &str) -> Result<String, CommandError> {
    let path = cwd.join(arg);
    if path.is_dir() {
        return Err(CommandError::IsDirectory {
            command,
            path: arg.to_string(),
        });
    }
    fs::read_to_string(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CommandError::NotFound {
            command,
            path: arg.to_string(),
        },
        _ => CommandError::Unreadable {
            command,
            path: arg.to_string(),
            source,
        },
    })
}

/// Last component of a path argument, used to label per-file output.
fn file_label(arg: &str) -> String {
    Path::new(arg)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string())
}

/// Write the arguments to the output, separated by spaces and followed by a newline.
///
/// Arguments are printed verbatim, so `echo -n` prints `-n`.
pub struct Echo {
    pub args: Vec<String>,
}

impl FromArgs for Echo {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Echo {
            args: args.iter().map(|arg| arg.to_string()).collect(),
        })
    }
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(
        self,
        _input: InputStream,
        output: &mut OutputStream,
        _errors: &mut OutputStream,
        _cwd: &Path,
    ) -> Result<()> {
        output.write_line(format!("{}\n", self.args.join(" ")));
        Ok(())
    }
}

/// Print the current working directory. Arguments, flags included, are ignored.
pub struct Pwd;

impl FromArgs for Pwd {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Pwd)
    }
}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(
        self,
        _input: InputStream,
        output: &mut OutputStream,
        _errors: &mut OutputStream,
        cwd: &Path,
    ) -> Result<()> {
        output.write_line(format!("{}\n", cwd.display()));
        Ok(())
    }
}

/// Exit the shell process. Arguments are ignored, so `exit --help` exits too.
pub struct Exit;

impl FromArgs for Exit {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit)
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(
        self,
        _input: InputStream,
        _output: &mut OutputStream,
        _errors: &mut OutputStream,
        _cwd: &Path,
    ) -> Result<()> {
        log::debug!("exit requested");
        std::process::exit(0)
    }
}

#[derive(FromArgs)]
/// print file(s) to the output
pub struct Cat {
    #[argh(positional)]
    /// files to print. If none provided, copies the input.
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn execute(
        self,
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
        cwd: &Path,
    ) -> Result<()> {
        if self.files.is_empty() {
            output.write_lines(input.into_lines());
            return Ok(());
        }
        for fname in &self.files {
            match read_file(Self::name(), cwd, fname) {
                Ok(content) => output.write_lines(content.split_inclusive('\n')),
                Err(e) => errors.write_line(e.to_string()),
            }
        }
        Ok(())
    }
}

/// Line, word and byte counts of some text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    pub bytes: usize,
}

impl Counts {
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count(),
            words: text.split_whitespace().count(),
            bytes: text.len(),
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lines, self.words, self.bytes)
    }
}

#[derive(FromArgs)]
/// count lines, words and bytes
pub struct Wc {
    #[argh(positional)]
    /// files to count. If none provided, counts the input.
    pub files: Vec<String>,
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn execute(
        self,
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
        cwd: &Path,
    ) -> Result<()> {
        if self.files.is_empty() {
            output.write_line(format!("{}\n", Counts::of(&input.concat())));
            return Ok(());
        }
        let mut total = Counts::default();
        for fname in &self.files {
            match read_file(Self::name(), cwd, fname) {
                Ok(content) => {
                    let counts = Counts::of(&content);
                    total += counts;
                    output.write_line(format!("{} {}\n", counts, file_label(fname)));
                }
                Err(e) => errors.write_line(e.to_string()),
            }
        }
        if self.files.len() > 1 {
            output.write_line(format!("{} total\n", total));
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// print lines matching a pattern
pub struct Grep {
    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    pub ignore_case: bool,

    #[argh(switch, short = 'w')]
    /// match only whole words
    pub word_regexp: bool,

    #[argh(option, short = 'A', default = "0")]
    /// print NUM lines of trailing context after matching lines
    pub after_context: usize,

    #[argh(positional)]
    /// the pattern to search for (a regular expression)
    pub pattern: String,

    #[argh(positional)]
    /// files to search. If none provided, reads the input.
    pub files: Vec<String>,
}

impl Grep {
    fn build_regex(&self) -> Result<Regex> {
        let pattern = if self.word_regexp {
            format!(r"\b(?:{})\b", self.pattern)
        } else {
            self.pattern.clone()
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .dot_matches_new_line(true)
            .build()
            .with_context(|| format!("invalid pattern `{}`", self.pattern))
    }

    /// Matching lines plus `after_context` lines after each match, each line at most once.
    fn select(&self, lines: Vec<String>, re: &Regex) -> Vec<String> {
        let mut to_print = vec![false; lines.len()];
        for (i, line) in lines.iter().enumerate() {
            if re.is_match(line) {
                let end = i
                    .saturating_add(self.after_context)
                    .saturating_add(1)
                    .min(lines.len());
                to_print[i..end].fill(true);
            }
        }
        lines
            .into_iter()
            .zip(to_print)
            .filter_map(|(line, keep)| keep.then_some(line))
            .collect()
    }
}

impl BuiltinCommand for Grep {
    fn name() -> &'static str {
        "grep"
    }

    fn execute(
        self,
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
        cwd: &Path,
    ) -> Result<()> {
        let re = self.build_regex()?;

        if self.files.is_empty() {
            output.write_lines(self.select(input.into_lines(), &re));
            return Ok(());
        }

        let with_label = self.files.len() > 1;
        for fname in &self.files {
            let content = match read_file(Self::name(), cwd, fname) {
                Ok(content) => content,
                Err(e) => {
                    errors.write_line(e.to_string());
                    continue;
                }
            };
            let lines = content.lines().map(str::to_owned).collect();
            let selected = self.select(lines, &re);
            if with_label {
                let label = file_label(fname);
                output.write_lines(selected.into_iter().map(|line| format!("{label}:{line}")));
            } else {
                output.write_lines(selected);
            }
        }
        Ok(())
    }
}
