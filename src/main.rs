//! Firmware streaming the potentiometer (or electrode) wired to GPIO0 over the console,
//! one reading per line. Build with the `eeg` feature for labelled readings every second,
//! and with `uart` to stream over UART1 (TX: pin 16, RX: pin 17) instead of the console.

#[cfg(target_os = "espidf")]
fn main() {
    use adc_streamer::{
        delay::FreeRtosDelay, gpio::AdcAnalogIn, peripherals::Peripherals, SampleLoop,
        SampleLoopError, SamplerConfig,
    };

    #[cfg(feature = "uart")]
    const UART_TX_PIN: usize = 16;
    #[cfg(feature = "uart")]
    const UART_RX_PIN: usize = 17;
    #[cfg(feature = "uart")]
    const UART_NUM: usize = 1;

    /// Nothing can recover a board whose peripherals failed, the panic handler resets it.
    fn halt(err: SampleLoopError) -> ! {
        log::error!("Sampling halted: {err:?}");
        panic!("Sampling halted: {err:?}");
    }

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::new_sharable();
    let analog = AdcAnalogIn::high_atten(peripherals.clone());

    #[cfg(feature = "uart")]
    let sink = adc_streamer::serial::UartSink::new(
        peripherals,
        UART_TX_PIN,
        UART_RX_PIN,
        UART_NUM,
        adc_streamer::serial::DEFAULT_BAUDRATE,
    );
    #[cfg(not(feature = "uart"))]
    let sink = {
        drop(peripherals);
        adc_streamer::serial::WriterSink::stdout()
    };

    let mut sampler = SampleLoop::new(SamplerConfig::DEFAULT, analog, sink, FreeRtosDelay)
        .unwrap_or_else(|err| halt(err));
    if let Err(err) = sampler.initialize() {
        halt(err);
    }
    match sampler.run_forever() {
        Ok(never) => match never {},
        Err(err) => halt(err),
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!("adc_streamer is firmware for the esp32C6, build it for an ESP-IDF target such as riscv32imac-esp-espidf");
    std::process::exit(1);
}
