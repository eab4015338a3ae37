//! Streams raw readings of one ADC channel as lines of text over a serial transport, at a
//! fixed cadence.

mod config;
mod format;
mod microcontroller_src;
mod sample_loop;
mod utils;

pub mod gpio;
pub mod serial;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use config::*;
pub use format::{format_sample, parse_sample_line};
pub use microcontroller_src::peripherals;
pub use sample_loop::{Sample, SampleLoop};
pub use utils::delay;
pub use utils::sampler_error;
pub use utils::sampler_error::SampleLoopError;
