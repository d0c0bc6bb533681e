use crate::stream::{InputStream, OutputStream};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Command that is not a builtin.
pub struct ExternalCommand {
    name: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Run the process to completion.
    ///
    /// The input lines are written to the child's stdin. Its stdout lines, then its
    /// stderr lines, are appended to `output`. A launch failure becomes one error line.
    pub fn execute(
        self,
        input: InputStream,
        output: &mut OutputStream,
        errors: &mut OutputStream,
        cwd: &Path,
    ) {
        match self.run(&input, cwd) {
            Ok(lines) => output.write_lines(lines),
            Err(e) => {
                log::warn!("failed to run {:?}: {}", self.name, e);
                errors.write_line(format!("{}: {}", self.name, e));
            }
        }
    }

    fn run(&self, input: &InputStream, cwd: &Path) -> io::Result<Vec<String>> {
        let program = std::env::var_os("PATH")
            .and_then(|paths| find_command_path(&paths, Path::new(&self.name), cwd))
            .unwrap_or_else(|| PathBuf::from(&self.name));
        log::debug!("spawning {:?} {:?}", program, self.args);

        let mut child = Command::new(&program)
            .args(&self.args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Stdin is written from its own thread while stdout and stderr are collected.
        let data = input.concat();
        let result = thread::scope(|scope| {
            let writer = child.stdin.take().map(|mut stdin| {
                scope.spawn(move || match stdin.write_all(data.as_bytes()) {
                    // The child is free to exit without reading its input.
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                })
            });
            let output = child.wait_with_output();
            if let Some(writer) = writer {
                writer
                    .join()
                    .map_err(|_| io::Error::other("stdin writer panicked"))??;
            }
            output
        })?;
        log::debug!("{:?} finished with {}", program, result.status);

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        Ok(stdout
            .lines()
            .chain(stderr.lines())
            .map(str::to_owned)
            .collect())
    }
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - `./foo` or a relative path with several components (`bin/sh`): looked up in `cwd`.
/// - Single component: searched in every directory of `search_paths` (PATH).
/// - Empty path: `None`.
pub fn find_command_path(search_paths: &OsStr, path: &Path, cwd: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return existing(path.to_path_buf());
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(single), None) if !path.starts_with(".") => std::env::split_paths(search_paths)
            .map(|dir| dir.join(single.as_os_str()))
            .find(|candidate| candidate.is_file()),
        _ => existing(cwd.join(path)),
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() { Some(path) } else { None }
}
