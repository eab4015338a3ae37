use std::time::Instant;

use super::{Call, CallLog};
use crate::serial::{TextSink, TextSinkError};

/// Mock [`TextSink`] recording every successfully written line in the [`CallLog`].
#[derive(Debug)]
pub struct MockTextSink {
    log: CallLog,
    initialized: bool,
    writes: usize,
    init_fault: Option<TextSinkError>,
    write_fault: Option<(usize, TextSinkError)>,
    timestamps: Option<Vec<Instant>>,
}

impl MockTextSink {
    pub fn new(log: CallLog) -> Self {
        MockTextSink {
            log,
            initialized: false,
            writes: 0,
            init_fault: None,
            write_fault: None,
            timestamps: None,
        }
    }

    pub fn failing_init(mut self, err: TextSinkError) -> Self {
        self.init_fault = Some(err);
        self
    }

    /// Makes the write number `index`, counting from 0, fail with `err`.
    pub fn failing_write_at(mut self, index: usize, err: TextSinkError) -> Self {
        self.write_fault = Some((index, err));
        self
    }

    /// Records when each line was written.
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = Some(Vec::new());
        self
    }

    pub fn timestamps(&self) -> &[Instant] {
        self.timestamps.as_deref().unwrap_or_default()
    }
}

impl TextSink for MockTextSink {
    fn init(&mut self) -> Result<(), TextSinkError> {
        self.log.borrow_mut().push(Call::SinkInit);
        if let Some(err) = self.init_fault {
            return Err(err);
        }
        self.initialized = true;
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<(), TextSinkError> {
        if !self.initialized {
            return Err(TextSinkError::NotInitialized);
        }
        let index = self.writes;
        self.writes += 1;
        if let Some((fault_index, err)) = self.write_fault {
            if fault_index == index {
                return Err(err);
            }
        }
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.push(Instant::now());
        }
        self.log.borrow_mut().push(Call::WriteLine(String::from(text)));
        Ok(())
    }
}
