//! Deterministic in-memory doubles of the loop's collaborators. They all append to a shared
//! [`CallLog`] so tests can assert on the order of every hardware interaction.

mod analog_in;
mod delay;
mod text_sink;

pub use analog_in::MockAnalogIn;
pub use delay::MockDelay;
pub use text_sink::MockTextSink;

use crate::utils::auxiliary::{SharableRef, SharableRefExt};

/// One interaction with a mocked collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SinkInit,
    WriteLine(String),
    InitConverter(u8),
    EnableLine(usize),
    SelectChannel(u8),
    ReadRaw,
    Delay(u32),
}

pub type CallLog = SharableRef<Vec<Call>>;

pub fn new_call_log() -> CallLog {
    SharableRef::new_sharable(Vec::new())
}

/// Lines successfully written to a [`MockTextSink`], in order.
pub fn written_lines(log: &CallLog) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|call| match call {
            Call::WriteLine(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}
