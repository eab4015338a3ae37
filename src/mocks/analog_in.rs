use std::collections::VecDeque;

use super::{Call, CallLog};
use crate::{
    config::ADC_RESOLUTION_BITS,
    gpio::{AnalogInError, AnalogInput},
    Sample,
};

/// Mock [`AnalogInput`] returning a scripted sequence of samples. Once the script is
/// exhausted every read fails with `AnalogInError::ErrorReading`. Like the esp32C6 oneshot
/// ADC it only converts at 12 bits unless told otherwise.
#[derive(Debug)]
pub struct MockAnalogIn {
    log: CallLog,
    samples: VecDeque<Sample>,
    reads: usize,
    resolution_bits: u8,
    init_fault: Option<AnalogInError>,
    read_fault: Option<(usize, AnalogInError)>,
    bound_to_line: bool,
    converter_ready: bool,
    line: Option<usize>,
}

impl MockAnalogIn {
    pub fn new(log: CallLog, samples: impl IntoIterator<Item = Sample>) -> Self {
        MockAnalogIn {
            log,
            samples: samples.into_iter().collect(),
            reads: 0,
            resolution_bits: ADC_RESOLUTION_BITS,
            init_fault: None,
            read_fault: None,
            bound_to_line: false,
            converter_ready: false,
            line: None,
        }
    }

    /// Makes the converter support only `resolution_bits` wide conversions.
    pub fn with_resolution_bits(mut self, resolution_bits: u8) -> Self {
        self.resolution_bits = resolution_bits;
        self
    }

    /// Makes `init_converter` fail with `err`.
    pub fn failing_init(mut self, err: AnalogInError) -> Self {
        self.init_fault = Some(err);
        self
    }

    /// Makes the read number `index`, counting from 0, fail with `err`.
    pub fn failing_read_at(mut self, index: usize, err: AnalogInError) -> Self {
        self.read_fault = Some((index, err));
        self
    }

    /// Behaves like a converter whose channel is fixed by the enabled line: selecting any
    /// other channel fails.
    pub fn bound_to_line_channel(mut self) -> Self {
        self.bound_to_line = true;
        self
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl AnalogInput for MockAnalogIn {
    fn init_converter(&mut self, resolution_bits: u8) -> Result<(), AnalogInError> {
        self.record(Call::InitConverter(resolution_bits));
        if let Some(err) = self.init_fault {
            return Err(err);
        }
        if resolution_bits != self.resolution_bits {
            return Err(AnalogInError::UnsupportedResolution(resolution_bits));
        }
        self.converter_ready = true;
        Ok(())
    }

    fn enable_line(&mut self, line: usize) -> Result<(), AnalogInError> {
        self.record(Call::EnableLine(line));
        if !self.converter_ready {
            return Err(AnalogInError::NotInitialized);
        }
        self.line = Some(line);
        Ok(())
    }

    fn select_channel(&mut self, channel: u8) -> Result<(), AnalogInError> {
        self.record(Call::SelectChannel(channel));
        let line = self.line.ok_or(AnalogInError::NotInitialized)?;
        if self.bound_to_line && line != channel as usize {
            return Err(AnalogInError::ChannelMismatch { bound: line as u8, requested: channel });
        }
        Ok(())
    }

    fn read_raw(&mut self) -> Result<Sample, AnalogInError> {
        self.record(Call::ReadRaw);
        if self.line.is_none() {
            return Err(AnalogInError::NotInitialized);
        }
        let index = self.reads;
        self.reads += 1;
        match self.read_fault {
            Some((fault_index, err)) if fault_index == index => Err(err),
            _ => self.samples.pop_front().ok_or(AnalogInError::ErrorReading),
        }
    }
}
