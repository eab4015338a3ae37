mod text_sink;
mod writer_sink;
#[cfg(target_os = "espidf")]
mod uart;

pub use text_sink::*;
pub use writer_sink::*;
#[cfg(target_os = "espidf")]
pub use uart::*;
