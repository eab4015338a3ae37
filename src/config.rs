//! Build-time configuration of the sampling loop.

/// The GPIO the potentiometer (or electrode) is wired to. On the esp32C6, GPIO0 is ADC1 channel 0.
pub const ADC_PIN: usize = 0;
/// The ADC channel for ADC_PIN.
pub const ADC_CHANNEL: u8 = 0;
/// Resolution of the oneshot ADC, in bits.
pub const ADC_RESOLUTION_BITS: u8 = 12;
/// Delay between potentiometer readings in milliseconds.
pub const POTENTIOMETER_DELAY_MS: u32 = 100;
/// Delay between EEG readings in milliseconds.
pub const EEG_DELAY_MS: u32 = 1000;
/// Label printed before every EEG reading.
pub const EEG_LABEL: &str = "EEG reading: ";

const MAX_RESOLUTION_BITS: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidResolution(u8),
    InvalidLabel,
}

/// Immutable configuration of a [`crate::SampleLoop`].
///
/// - `line`: GPIO number enabled for analog input.
/// - `channel`: ADC channel selected before every conversion.
/// - `period_millis`: Idle time after every emitted sample. Zero means back to back.
/// - `label`: Optional literal printed before every value.
/// - `resolution_bits`: Bits in each conversion, bounding samples to `[0, 2^R - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub line: usize,
    pub channel: u8,
    pub period_millis: u32,
    pub label: Option<&'static str>,
    pub resolution_bits: u8,
}

impl SamplerConfig {
    /// Raw potentiometer readings every 100 ms.
    pub const POTENTIOMETER: SamplerConfig =
        SamplerConfig::new(ADC_PIN, ADC_CHANNEL, POTENTIOMETER_DELAY_MS);

    /// Labelled electrode readings every second.
    pub const EEG: SamplerConfig =
        SamplerConfig::new(ADC_PIN, ADC_CHANNEL, EEG_DELAY_MS).with_label(EEG_LABEL);

    #[cfg(not(feature = "eeg"))]
    pub const DEFAULT: SamplerConfig = SamplerConfig::POTENTIOMETER;

    #[cfg(feature = "eeg")]
    pub const DEFAULT: SamplerConfig = SamplerConfig::EEG;

    pub const fn new(line: usize, channel: u8, period_millis: u32) -> Self {
        SamplerConfig {
            line,
            channel,
            period_millis,
            label: None,
            resolution_bits: ADC_RESOLUTION_BITS,
        }
    }

    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub const fn with_period_millis(mut self, period_millis: u32) -> Self {
        self.period_millis = period_millis;
        self
    }

    pub const fn with_resolution_bits(mut self, resolution_bits: u8) -> Self {
        self.resolution_bits = resolution_bits;
        self
    }

    /// Largest value the converter can return with the configured resolution. Resolutions
    /// wider than a sample saturate at `u16::MAX`.
    pub const fn max_sample(&self) -> u16 {
        if self.resolution_bits >= MAX_RESOLUTION_BITS {
            return u16::MAX;
        }
        ((1u32 << self.resolution_bits) - 1) as u16
    }

    /// Checks that the configuration can produce an unambiguous stream.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidResolution`: If the resolution is 0 or wider than 16 bits
    /// - `ConfigError::InvalidLabel`: If the label contains a line terminator or ends in a digit
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution_bits == 0 || self.resolution_bits > MAX_RESOLUTION_BITS {
            return Err(ConfigError::InvalidResolution(self.resolution_bits));
        }
        if let Some(label) = self.label {
            let has_terminator = label.contains(['\n', '\r']);
            let ends_in_digit = label.bytes().last().is_some_and(|b| b.is_ascii_digit());
            if has_terminator || ends_in_digit {
                return Err(ConfigError::InvalidLabel);
            }
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig::DEFAULT
    }
}
