//! Destinations for formatted lines.
//!
//! The executor only needs something that accepts one line of text at a
//! time. No buffering or flushing behaviour is assumed beyond "the line
//! eventually shows up".

use std::io::{self, Write};

use tracing::info;

pub trait Sink {
    /// Accept one line, without a trailing newline.
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

/// Writes each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{line}")
    }
}

/// Writes newline-terminated lines to any [`Write`] implementor.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}

/// Forwards each line as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        info!(target: "exectime", "{}", line);
        Ok(())
    }
}

/// In-memory capture.
impl Sink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        (**self).emit(line)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        (**self).emit(line)
    }
}
