use crate::microcontroller_src::peripherals::PeripheralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSinkError {
    DriverError,
    InvalidPeripheral(PeripheralError),
    InvalidPin,
    InvalidUartNumber,
    NotInitialized,
    WriteError,
}

impl From<PeripheralError> for TextSinkError {
    fn from(value: PeripheralError) -> Self {
        TextSinkError::InvalidPeripheral(value)
    }
}

/// Capability of transmitting lines of text over whatever transport is attached.
pub trait TextSink {
    /// Brings up the transport.
    fn init(&mut self) -> Result<(), TextSinkError>;

    /// Transmits `text` followed by a line terminator. `text` must not contain one itself.
    fn write_line(&mut self, text: &str) -> Result<(), TextSinkError>;
}
