use std::mem;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::*;

use crate::utils::auxiliary::{SharableRef, SharableRefExt};

const PIN_COUNT: usize = 24;
const ANALOG_PINS_BOUNDS: (usize, usize) = (0, 6);
const DIGITAL_PINS_BOUNDS: (usize, usize) = (0, 23);
const UART_COUNT: usize = 2;
const UART_BOUNDS: (usize, usize) = (0, 1);

/// Peripherals registry shared between the analog input and the text sink, so each
/// of them can claim its resources while being initialized.
pub type SharablePeripherals = SharableRef<Peripherals>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralError {
    AlreadyTaken,
    NotAPin,
    OutOfBounds,
}

/// Represents the esp32 Peripheral allowing to instanciate diferent Peripheral Types
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Peripheral {
    Pin(u8),
    Adc,
    Uart(u8),
    #[default]
    None,
}

impl Peripheral {
    fn take(&mut self) -> Peripheral {
        mem::take(self)
    }

    /// Returns the pin number if the Peripheral is a Pin.
    ///
    /// # Errors
    ///
    /// - `PeripheralError::AlreadyTaken`: If the Peripheral was already handed out
    /// - `PeripheralError::NotAPin`: If the Peripheral is of another kind
    pub fn pin_number(&self) -> Result<u8, PeripheralError> {
        match self {
            Peripheral::Pin(pin_num) => Ok(*pin_num),
            Peripheral::None => Err(PeripheralError::AlreadyTaken),
            _ => Err(PeripheralError::NotAPin),
        }
    }

    /// If the Peripheral is a Pin returns the corresponding AnyIoPin.
    /// If not it returns PeripheralError::NotAPin
    #[cfg(target_os = "espidf")]
    pub fn into_any_io_pin(self) -> Result<AnyIOPin, PeripheralError> {
        let pin = match self.pin_number()? {
            0 => unsafe { Gpio0::new().downgrade() },
            1 => unsafe { Gpio1::new().downgrade() },
            2 => unsafe { Gpio2::new().downgrade() },
            3 => unsafe { Gpio3::new().downgrade() },
            4 => unsafe { Gpio4::new().downgrade() },
            5 => unsafe { Gpio5::new().downgrade() },
            6 => unsafe { Gpio6::new().downgrade() },
            7 => unsafe { Gpio7::new().downgrade() },
            8 => unsafe { Gpio8::new().downgrade() },
            9 => unsafe { Gpio9::new().downgrade() },
            10 => unsafe { Gpio10::new().downgrade() },
            11 => unsafe { Gpio11::new().downgrade() },
            12 => unsafe { Gpio12::new().downgrade() },
            13 => unsafe { Gpio13::new().downgrade() },
            15 => unsafe { Gpio15::new().downgrade() },
            16 => unsafe { Gpio16::new().downgrade() },
            17 => unsafe { Gpio17::new().downgrade() },
            18 => unsafe { Gpio18::new().downgrade() },
            19 => unsafe { Gpio19::new().downgrade() },
            20 => unsafe { Gpio20::new().downgrade() },
            21 => unsafe { Gpio21::new().downgrade() },
            22 => unsafe { Gpio22::new().downgrade() },
            23 => unsafe { Gpio23::new().downgrade() },
            _ => return Err(PeripheralError::NotAPin),
        };
        Ok(pin)
    }
}

/// Represents the available peripherals in the esp32C6 used by the streamer and provides a
/// way to get each particular peripheral. Subsequent gets of the same peripheral will return
/// Peripheral::None. An analog pin is also reachable as a digital pin, but only the first
/// getter will return it.
pub struct Peripherals {
    pins: [Peripheral; PIN_COUNT],
    adc: Peripheral,
    uart: [Peripheral; UART_COUNT],
}

impl Peripherals {
    pub fn new() -> Peripherals {
        // GPIO14 is not bonded out on the esp32C6
        let pins: [Peripheral; PIN_COUNT] = std::array::from_fn(|pin_num| match pin_num {
            14 => Peripheral::None,
            _ => Peripheral::Pin(pin_num as u8),
        });
        Peripherals {
            pins,
            adc: Peripheral::Adc,
            uart: [Peripheral::Uart(0), Peripheral::Uart(1)],
        }
    }

    pub fn new_sharable() -> SharablePeripherals {
        SharableRef::new_sharable(Peripherals::new())
    }

    pub fn get_digital_pin(&mut self, pin_num: usize) -> Peripheral {
        self.get_pin_on_bound(pin_num, DIGITAL_PINS_BOUNDS)
    }

    pub fn get_analog_pin(&mut self, pin_num: usize) -> Peripheral {
        self.get_pin_on_bound(pin_num, ANALOG_PINS_BOUNDS)
    }

    fn get_pin_on_bound(&mut self, pin_num: usize, bound: (usize, usize)) -> Peripheral {
        if pin_num >= bound.0 && pin_num <= bound.1 {
            return self.pins[pin_num].take();
        }
        Peripheral::None
    }

    pub fn get_adc(&mut self) -> Peripheral {
        self.adc.take()
    }

    pub fn get_uart(&mut self, uart_num: usize) -> Peripheral {
        if uart_num >= UART_BOUNDS.0 && uart_num <= UART_BOUNDS.1 {
            return self.uart[uart_num].take();
        }
        Peripheral::None
    }

    /// Takes a UART together with its TX and RX pins. Nothing is taken unless the three of
    /// them are available.
    ///
    /// # Returns
    ///
    /// The `(uart, tx, rx)` peripherals.
    ///
    /// # Errors
    ///
    /// - `PeripheralError::OutOfBounds`: If the UART or one of the pins does not exist
    /// - `PeripheralError::AlreadyTaken`: If any of them was already handed out, or both pins are the same
    pub fn get_uart_with_pins(
        &mut self,
        uart_num: usize,
        tx_pin: usize,
        rx_pin: usize,
    ) -> Result<(Peripheral, Peripheral, Peripheral), PeripheralError> {
        let in_bounds = |pin_num: usize| pin_num >= DIGITAL_PINS_BOUNDS.0 && pin_num <= DIGITAL_PINS_BOUNDS.1;
        if uart_num < UART_BOUNDS.0 || uart_num > UART_BOUNDS.1 || !in_bounds(tx_pin) || !in_bounds(rx_pin) {
            return Err(PeripheralError::OutOfBounds);
        }
        let available = [&self.uart[uart_num], &self.pins[tx_pin], &self.pins[rx_pin]]
            .iter()
            .all(|peripheral| **peripheral != Peripheral::None);
        if tx_pin == rx_pin || !available {
            return Err(PeripheralError::AlreadyTaken);
        }
        Ok((self.uart[uart_num].take(), self.pins[tx_pin].take(), self.pins[rx_pin].take()))
    }
}

impl Default for Peripherals {
    fn default() -> Self {
        Self::new()
    }
}
