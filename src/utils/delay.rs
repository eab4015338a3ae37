use std::{thread, time::Duration};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::delay::FreeRtos;

/// Capability of suspending the current task for a number of milliseconds, yielding the processor.
pub trait Delay {
    fn delay_ms(&mut self, milliseconds: u32);
}

/// Delays the current FreeRTOS task. A zero delay still yields to other ready tasks,
/// which keeps the task watchdog fed when sampling back to back.
#[cfg(target_os = "espidf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct FreeRtosDelay;

#[cfg(target_os = "espidf")]
impl Delay for FreeRtosDelay {
    fn delay_ms(&mut self, milliseconds: u32) {
        FreeRtos::delay_ms(milliseconds)
    }
}

/// Delays the current std thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, milliseconds: u32) {
        if milliseconds > 0 {
            thread::sleep(Duration::from_millis(milliseconds as u64));
        }
    }
}
