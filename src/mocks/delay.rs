use super::{Call, CallLog};
use crate::utils::delay::Delay;

/// Mock [`Delay`] that returns immediately and records the requested time.
#[derive(Debug)]
pub struct MockDelay {
    log: CallLog,
}

impl MockDelay {
    pub fn new(log: CallLog) -> Self {
        MockDelay { log }
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, milliseconds: u32) {
        self.log.borrow_mut().push(Call::Delay(milliseconds));
    }
}
