use crate::{config::ConfigError, gpio::AnalogInError, serial::TextSinkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleLoopError {
    AlreadyInitialized,
    AnalogInError(AnalogInError),
    InvalidConfig(ConfigError),
    NotInitialized,
    TextSinkError(TextSinkError),
}

impl From<AnalogInError> for SampleLoopError {
    fn from(value: AnalogInError) -> Self {
        SampleLoopError::AnalogInError(value)
    }
}

impl From<TextSinkError> for SampleLoopError {
    fn from(value: TextSinkError) -> Self {
        SampleLoopError::TextSinkError(value)
    }
}

impl From<ConfigError> for SampleLoopError {
    fn from(value: ConfigError) -> Self {
        SampleLoopError::InvalidConfig(value)
    }
}
