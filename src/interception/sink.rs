// src/interception/sink.rs
//! Transcript destinations
//!
//! A sink receives one fully formatted line per call. Sinks never fail from
//! the caller's point of view and are responsible for their own locking.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info};

/// Target used by [`TracingSink`] events
pub const TRANSCRIPT_TARGET: &str = "http_tap::transcript";

/// Line severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-oriented transcript destination
pub trait LogSink: Send + Sync {
    fn write_line(&self, severity: Severity, line: &str);
}

/// Emits each line as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, severity: Severity, line: &str) {
        match severity {
            Severity::Info => info!(target: TRANSCRIPT_TARGET, "{}", line),
            Severity::Error => error!(target: TRANSCRIPT_TARGET, "{}", line),
        }
    }
}

/// Appends lines to a writer, flushing after each one
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed
    pub fn append_to(path: impl AsRef<Path>) -> crate::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, _severity: Severity, line: &str) {
        let mut writer = self.writer.lock();
        // A transcript that cannot be written must not fail the request.
        let _ = writeln!(writer, "{}", line).and_then(|_| writer.flush());
    }
}

/// Bounded in-memory transcript; the oldest lines are dropped when full
pub struct BufferSink {
    lines: Mutex<VecDeque<(Severity, String)>>,
    capacity: usize,
}

impl BufferSink {
    pub const DEFAULT_CAPACITY: usize = 10_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    /// Snapshot of the captured lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for BufferSink {
    fn write_line(&self, severity: Severity, line: &str) {
        let mut lines = self.lines.lock();
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back((severity, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_buffer_sink_ring() {
        let sink = BufferSink::with_capacity(2);
        sink.write_line(Severity::Info, "one");
        sink.write_line(Severity::Error, "two");
        sink.write_line(Severity::Info, "three");

        assert_eq!(sink.lines(), vec!["two", "three"]);
        assert_eq!(sink.entries()[0].0, Severity::Error);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_writer_sink_appends_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line(Severity::Info, "a|INFO||req:1|first");
        sink.write_line(Severity::Error, "a|ERROR||req:1|second");

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "a|INFO||req:1|first\na|ERROR||req:1|second\n");
    }

    #[test]
    fn test_writer_sink_append_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.log");

        let sink = WriterSink::append_to(&path).unwrap();
        sink.write_line(Severity::Info, "line");
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_swallows_errors() {
        let sink = WriterSink::new(BrokenWriter);
        sink.write_line(Severity::Error, "dropped");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }
}
