mod analog_in;
#[cfg(target_os = "espidf")]
mod adc_analog_in;

pub use analog_in::*;
#[cfg(target_os = "espidf")]
pub use adc_analog_in::*;
