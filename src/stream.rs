//! Line buffers that connect the stages of a pipeline.
//!
//! A line is stored exactly as the command produced it: commands that want a line
//! terminator write it themselves.

use std::mem;

/// Lines handed to a command as its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputStream {
    lines: Vec<String>,
}

impl InputStream {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// All lines glued together, as a byte stream reader would see them.
    pub fn concat(&self) -> String {
        self.lines.concat()
    }
}

/// Append-only sink for command output or error lines.
#[derive(Debug, Default)]
pub struct OutputStream {
    lines: Vec<String>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn write_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take every buffered line, leaving the stream empty.
    pub fn drain(&mut self) -> Vec<String> {
        mem::take(&mut self.lines)
    }

    /// Drain the buffer into the input of the next pipeline stage.
    pub fn drain_into_input(&mut self) -> InputStream {
        InputStream::new(self.drain())
    }
}
