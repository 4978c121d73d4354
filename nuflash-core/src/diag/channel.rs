//! Bounded diagnostic channel
//!
//! Three levels share one buffer:
//!
//! - debug: `\r\n[Debug](file:line) message\r\n`, only with the `debug-log`
//!   feature
//! - info: `\r\n[LogInfo]message\r\n`
//! - print: the message as is
//!
//! Each piece is formatted into the buffer, written to the sink, and the
//! buffer is cleared for the next one. Text past the buffer capacity is cut
//! off, and sink errors are dropped: diagnostics never fail the caller.

use core::fmt::{self, Write as _};

use embedded_io::Write;
use heapless::String;

/// Default capacity of the formatting buffer
pub const LOG_BUF_SIZE: usize = 128;

/// Bytes per line in hex dumps
#[cfg(feature = "debug-log")]
const DUMP_BYTES_PER_LINE: usize = 10;

/// Diagnostic channel writing to a character sink
pub struct Diagnostics<W, const N: usize = LOG_BUF_SIZE> {
    sink: W,
    buf: String<N>,
}

/// Fills a string up to its capacity, then reports an error
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> fmt::Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

impl<W: Write, const N: usize> Diagnostics<W, N> {
    /// Create a channel writing to `sink`
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buf: String::new(),
        }
    }

    /// Access the sink
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Give back the sink
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Emit a debug trace tagged with its origin
    ///
    /// Compiled out unless the `debug-log` feature is enabled.
    pub fn debug(&mut self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        #[cfg(feature = "debug-log")]
        {
            self.emit(format_args!("\r\n[Debug]({}:{}) ", file, line));
            self.emit(args);
            self.emit_str("\r\n");
        }
        #[cfg(not(feature = "debug-log"))]
        let _ = (file, line, args);
    }

    /// Emit an informational message
    pub fn info(&mut self, args: fmt::Arguments<'_>) {
        self.emit_str("\r\n[LogInfo]");
        self.emit(args);
        self.emit_str("\r\n");
    }

    /// Emit a message without prefix or line ending
    pub fn print(&mut self, args: fmt::Arguments<'_>) {
        self.emit(args);
    }

    /// Emit a hex dump, ten bytes per line
    ///
    /// Compiled out unless the `debug-log` feature is enabled.
    pub fn dump(&mut self, bytes: &[u8]) {
        #[cfg(feature = "debug-log")]
        {
            for (i, byte) in bytes.iter().enumerate() {
                self.emit(format_args!("0x{:02x}, ", byte));
                if (i + 1) % DUMP_BYTES_PER_LINE == 0 {
                    self.emit_str("\r\n");
                }
            }
            self.emit_str("\r\n");
        }
        #[cfg(not(feature = "debug-log"))]
        let _ = bytes;
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        self.buf.clear();
        // Err here only means the message was cut at capacity
        let _ = Truncating(&mut self.buf).write_fmt(args);
        let _ = self.sink.write_all(self.buf.as_bytes());
    }

    fn emit_str(&mut self, s: &str) {
        let _ = self.sink.write_all(s.as_bytes());
    }
}
