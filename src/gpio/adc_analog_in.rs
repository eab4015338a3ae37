use crate::{
    config::ADC_RESOLUTION_BITS,
    gpio::{AnalogInError, AnalogInput},
    microcontroller_src::peripherals::{Peripheral, SharablePeripherals},
    Sample,
};
use esp_idf_svc::hal::{adc::attenuation::adc_atten_t, adc::*, gpio::*};
use oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver};
use std::rc::Rc;

pub type SharableAdcDriver<'a> = Rc<AdcDriver<'a, ADC1>>;

/// Oneshot ADC1 input of the esp32C6.
/// - `peripherals`: Registry the ADC unit and the analog pin are claimed from
/// - `attenuation`: Attenuation applied to the enabled line
/// - `adc_driver`: The ADC1 driver, once the converter is initialized
/// - `adc_channel_driver`: The channel of the enabled line, once it is enabled
pub struct AdcAnalogIn<'a> {
    peripherals: SharablePeripherals,
    attenuation: adc_atten_t,
    adc_driver: Option<SharableAdcDriver<'a>>,
    adc_channel_driver: Option<AnalogChannels<'a>>,
}

/// Enums the possible channels from the ADC. In the ESP32-C6 the
/// ADC has 7 channels, each on a different GPIO going from
/// GPIO-0 to GPIO-6 inclusive
enum AnalogChannels<'a> {
    Channel0(AdcChannelDriver<'a, Gpio0, SharableAdcDriver<'a>>),
    Channel1(AdcChannelDriver<'a, Gpio1, SharableAdcDriver<'a>>),
    Channel2(AdcChannelDriver<'a, Gpio2, SharableAdcDriver<'a>>),
    Channel3(AdcChannelDriver<'a, Gpio3, SharableAdcDriver<'a>>),
    Channel4(AdcChannelDriver<'a, Gpio4, SharableAdcDriver<'a>>),
    Channel5(AdcChannelDriver<'a, Gpio5, SharableAdcDriver<'a>>),
    Channel6(AdcChannelDriver<'a, Gpio6, SharableAdcDriver<'a>>),
}

impl<'a> AnalogChannels<'a> {
    /// ADC1 channel number of the bound GPIO.
    fn channel(&self) -> u8 {
        match self {
            AnalogChannels::Channel0(_) => 0,
            AnalogChannels::Channel1(_) => 1,
            AnalogChannels::Channel2(_) => 2,
            AnalogChannels::Channel3(_) => 3,
            AnalogChannels::Channel4(_) => 4,
            AnalogChannels::Channel5(_) => 5,
            AnalogChannels::Channel6(_) => 6,
        }
    }
}

impl<'a> AdcAnalogIn<'a> {
    /// Creates a new AdcAnalogIn. No hardware is touched until `init_converter`.
    ///
    /// # Arguments
    ///
    /// - `peripherals`: The shared peripherals registry
    /// - `attenuation`: An adc_atten_t representing the desired attenuation
    pub fn new(peripherals: SharablePeripherals, attenuation: adc_atten_t) -> Self {
        AdcAnalogIn {
            peripherals,
            attenuation,
            adc_driver: None,
            adc_channel_driver: None,
        }
    }

    /// Creates a new AdcAnalogIn with attenuation set to 11dB, which covers
    /// the full 0-3.3V range of a potentiometer wired between the rails.
    pub fn high_atten(peripherals: SharablePeripherals) -> Self {
        Self::new(peripherals, attenuation::DB_11)
    }

    /// Creates a new analog channel driver for a given pin
    ///
    /// # Errors
    ///
    /// - `AnalogInError::InvalidPin`: If the pin is not wired to ADC1
    /// - `AnalogInError::ChannelCreationError`: If the channel could not be created
    fn new_channel(
        pin_num: u8,
        sharable_adc_driver: SharableAdcDriver<'a>,
        attenuation: adc_atten_t,
    ) -> Result<AnalogChannels<'a>, AnalogInError> {
        let mut config = AdcChannelConfig::new();
        config.attenuation = attenuation;
        config.resolution = Resolution::Resolution12Bit;
        config.calibration = true;
        let adc_channel_driver = match pin_num {
            0 => AnalogChannels::Channel0(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio0::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            1 => AnalogChannels::Channel1(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio1::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            2 => AnalogChannels::Channel2(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio2::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            3 => AnalogChannels::Channel3(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio3::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            4 => AnalogChannels::Channel4(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio4::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            5 => AnalogChannels::Channel5(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio5::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            6 => AnalogChannels::Channel6(
                AdcChannelDriver::new(sharable_adc_driver, unsafe { Gpio6::new() }, &config)
                    .map_err(|_| AnalogInError::ChannelCreationError)?,
            ),
            _ => return Err(AnalogInError::InvalidPin),
        };
        Ok(adc_channel_driver)
    }
}

impl<'a> AnalogInput for AdcAnalogIn<'a> {
    /// The oneshot driver of the esp32C6 only converts at 12 bits.
    fn init_converter(&mut self, resolution_bits: u8) -> Result<(), AnalogInError> {
        if resolution_bits != ADC_RESOLUTION_BITS {
            return Err(AnalogInError::UnsupportedResolution(resolution_bits));
        }
        if self.adc_driver.is_none() {
            if self.peripherals.borrow_mut().get_adc() != Peripheral::Adc {
                return Err(AnalogInError::AdcDriverError);
            }
            let driver =
                AdcDriver::new(unsafe { ADC1::new() }).map_err(|_| AnalogInError::AdcDriverError)?;
            self.adc_driver.replace(Rc::new(driver));
        }
        Ok(())
    }

    fn enable_line(&mut self, line: usize) -> Result<(), AnalogInError> {
        let adc_driver = self.adc_driver.clone().ok_or(AnalogInError::NotInitialized)?;
        let pin_num = self.peripherals.borrow_mut().get_analog_pin(line).pin_number()?;
        let channel = Self::new_channel(pin_num, adc_driver, self.attenuation)?;
        log::debug!("GPIO{pin_num} enabled as ADC1 channel {}", channel.channel());
        self.adc_channel_driver.replace(channel);
        Ok(())
    }

    /// The oneshot driver binds its channel when the line is enabled, so selecting
    /// only checks that the requested channel is the bound one.
    fn select_channel(&mut self, channel: u8) -> Result<(), AnalogInError> {
        let bound = self
            .adc_channel_driver
            .as_ref()
            .ok_or(AnalogInError::NotInitialized)?
            .channel();
        if bound != channel {
            return Err(AnalogInError::ChannelMismatch { bound, requested: channel });
        }
        Ok(())
    }

    /// Returns the raw value read from the analog pin.
    /// The value returned is not attenuated, so its ranges is [0, 4095].
    fn read_raw(&mut self) -> Result<Sample, AnalogInError> {
        match self.adc_channel_driver.as_mut().ok_or(AnalogInError::NotInitialized)? {
            AnalogChannels::Channel0(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel1(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel2(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel3(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel4(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel5(channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel6(channel_driver) => channel_driver.read_raw(),
        }
        .map_err(|_| AnalogInError::ErrorReading)
    }
}
