// Licensed under the Apache-2.0 license

//! Shared driver infrastructure: the logging abstraction used by controllers
//! and device drivers.
//!
//! Drivers are generic over a [`Logger`] and default to [`NoOpLogger`], so a
//! build without a console pays nothing for log calls.

use core::fmt::{self, Write as _};

/// Maximum rendered length of a single formatted log message.
pub const LOG_LINE_CAPACITY: usize = 96;

/// Minimal leveled logging sink.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn info(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Logger that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn info(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn debug(&mut self, msg: &str) {
        (**self).debug(msg);
    }

    fn info(&mut self, msg: &str) {
        (**self).info(msg);
    }

    fn error(&mut self, msg: &str) {
        (**self).error(msg);
    }
}

/// Logger writing `[LEVEL] tag: message` lines to any `embedded_io::Write`
/// sink, typically a UART.
///
/// Write errors are dropped; a failing console must not take the driver down.
pub struct WriteLogger<W: embedded_io::Write> {
    sink: W,
    tag: &'static str,
}

impl<W: embedded_io::Write> WriteLogger<W> {
    pub fn new(sink: W, tag: &'static str) -> Self {
        Self { sink, tag }
    }

    /// Consume the logger and hand back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, level: &str, msg: &str) {
        let _ = self.sink.write_all(level.as_bytes());
        let _ = self.sink.write_all(self.tag.as_bytes());
        let _ = self.sink.write_all(b": ");
        let _ = self.sink.write_all(msg.as_bytes());
        let _ = self.sink.write_all(b"\r\n");
    }
}

impl<W: embedded_io::Write> Logger for WriteLogger<W> {
    fn debug(&mut self, msg: &str) {
        self.emit("[D] ", msg);
    }

    fn info(&mut self, msg: &str) {
        self.emit("[I] ", msg);
    }

    fn error(&mut self, msg: &str) {
        self.emit("[E] ", msg);
    }
}

/// Render `args` into a bounded line buffer.
///
/// Output past [`LOG_LINE_CAPACITY`] bytes is cut off at a character boundary.
#[must_use]
pub fn format_line(args: fmt::Arguments<'_>) -> heapless::String<LOG_LINE_CAPACITY> {
    let mut line = Truncating(heapless::String::new());
    let _ = line.write_fmt(args);
    line.0
}

struct Truncating(heapless::String<LOG_LINE_CAPACITY>);

impl fmt::Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
