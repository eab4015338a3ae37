use esp_idf_svc::hal::{
    gpio::{Gpio0, Gpio1},
    uart::{config, UartDriver, UART0, UART1},
    units::Hertz,
};

use super::{TextSink, TextSinkError};
use crate::microcontroller_src::peripherals::{Peripheral, SharablePeripherals};

pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Text sink over one of the esp32C6 UARTs.
/// - `peripherals`: Registry the pins and the UART are claimed from on `init`
/// - `driver`: The UART driver, once initialized
pub struct UartSink<'a> {
    peripherals: SharablePeripherals,
    tx_pin: usize,
    rx_pin: usize,
    uart_num: usize,
    baudrate: u32,
    driver: Option<UartDriver<'a>>,
}

impl<'a> UartSink<'a> {
    /// Creates a new UartSink. No hardware is touched until `init`.
    ///
    /// # Arguments
    ///
    /// - `peripherals`: The shared peripherals registry
    /// - `tx_pin`: The pin number used as TX
    /// - `rx_pin`: The pin number used as RX
    /// - `uart_num`: 0 or 1, the UART to use
    /// - `baudrate`: The baudrate of the link
    pub fn new(peripherals: SharablePeripherals, tx_pin: usize, rx_pin: usize, uart_num: usize, baudrate: u32) -> Self {
        UartSink { peripherals, tx_pin, rx_pin, uart_num, baudrate, driver: None }
    }

    fn new_driver(&self) -> Result<UartDriver<'a>, TextSinkError> {
        let (uart_peripheral, tx, rx) = self
            .peripherals
            .borrow_mut()
            .get_uart_with_pins(self.uart_num, self.tx_pin, self.rx_pin)?;
        let tx_peripheral = tx.into_any_io_pin()?;
        let rx_peripheral = rx.into_any_io_pin()?;
        let config = config::Config::new().baudrate(Hertz(self.baudrate));

        let driver = match uart_peripheral {
            Peripheral::Uart(0) => UartDriver::new(
                unsafe { UART0::new() },
                tx_peripheral,
                rx_peripheral,
                Option::<Gpio0>::None,
                Option::<Gpio1>::None,
                &config,
            ),
            Peripheral::Uart(1) => UartDriver::new(
                unsafe { UART1::new() },
                tx_peripheral,
                rx_peripheral,
                Option::<Gpio0>::None,
                Option::<Gpio1>::None,
                &config,
            ),
            _ => return Err(TextSinkError::InvalidUartNumber),
        };
        driver.map_err(|_| TextSinkError::DriverError)
    }

    fn write_all(driver: &UartDriver<'a>, mut bytes: &[u8]) -> Result<(), TextSinkError> {
        while !bytes.is_empty() {
            let written = driver.write(bytes).map_err(|_| TextSinkError::WriteError)?;
            if written == 0 {
                return Err(TextSinkError::WriteError);
            }
            bytes = &bytes[written..];
        }
        Ok(())
    }
}

impl<'a> TextSink for UartSink<'a> {
    fn init(&mut self) -> Result<(), TextSinkError> {
        if self.driver.is_none() {
            let driver = self.new_driver()?;
            log::debug!("UART{} up at {} baud", self.uart_num, self.baudrate);
            self.driver.replace(driver);
        }
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<(), TextSinkError> {
        let driver = self.driver.as_ref().ok_or(TextSinkError::NotInitialized)?;
        Self::write_all(driver, text.as_bytes())?;
        Self::write_all(driver, b"\n")
    }
}
