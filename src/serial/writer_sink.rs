use std::io::{self, Stdout, Write};

use super::{TextSink, TextSinkError};

/// Text sink over any `std::io::Write`. On the esp32 stdout is the console, which the
/// ESP-IDF startup code already attached to the USB-serial port before `main` runs.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    initialized: bool,
}

impl WriterSink<Stdout> {
    /// Creates a sink over the console.
    pub fn stdout() -> Self {
        WriterSink::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer, initialized: false }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TextSink for WriterSink<W> {
    fn init(&mut self) -> Result<(), TextSinkError> {
        self.writer.flush().map_err(|_| TextSinkError::DriverError)?;
        self.initialized = true;
        Ok(())
    }

    /// Every line is flushed so the reader on the other end sees it immediately.
    fn write_line(&mut self, text: &str) -> Result<(), TextSinkError> {
        if !self.initialized {
            return Err(TextSinkError::NotInitialized);
        }
        writeln!(self.writer, "{text}").map_err(|_| TextSinkError::WriteError)?;
        self.writer.flush().map_err(|_| TextSinkError::WriteError)
    }
}
