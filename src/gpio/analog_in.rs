use crate::{microcontroller_src::peripherals::PeripheralError, Sample};

/// Enums the different errors possible when working with the analog in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogInError {
    AdcDriverError,
    ChannelCreationError,
    ChannelMismatch { bound: u8, requested: u8 },
    ErrorReading,
    InvalidPeripheral(PeripheralError),
    InvalidPin,
    NotInitialized,
    UnsupportedResolution(u8),
}

impl From<PeripheralError> for AnalogInError {
    fn from(value: PeripheralError) -> Self {
        AnalogInError::InvalidPeripheral(value)
    }
}

/// Capability of reading raw conversions from a multiplexed analog-to-digital converter.
///
/// Callers bring the converter up with `init_converter`, then `enable_line` once, and after
/// that every `select_channel` + `read_raw` pair returns a fresh conversion of that line.
pub trait AnalogInput {
    /// Brings up the converter so that every conversion is `resolution_bits` wide.
    ///
    /// # Errors
    ///
    /// - `AnalogInError::UnsupportedResolution`: If the converter cannot produce that width
    fn init_converter(&mut self, resolution_bits: u8) -> Result<(), AnalogInError>;

    /// Enables the GPIO `line` for analog use.
    fn enable_line(&mut self, line: usize) -> Result<(), AnalogInError>;

    /// Selects `channel` as the source of the next conversion.
    fn select_channel(&mut self, channel: u8) -> Result<(), AnalogInError>;

    /// Triggers one conversion and returns the raw value, unclamped and uncalibrated.
    fn read_raw(&mut self) -> Result<Sample, AnalogInError>;
}
