//! Light sense channels via the ESP32 ADC.
//!
//! Each light gets a photodiode (or a shunt on its supply) wired to an ADC1
//! pin. A dark or open light reads high, which the controller treats as a
//! defect once the reading passes the configured threshold.
//!
//! Note: On ESP32-C3, only GPIO0-4 are on ADC1. Keep sense lines there.

use core::borrow::Borrow;

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::gpio::ADCPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

use crate::traits::SenseInput;

/// ADC sense channel for one light.
///
/// Readings are raw 12-bit values (0-4095).
///
/// # Example
///
/// ```ignore
/// use traffic_light::hal::esp32::Esp32Sense;
/// use traffic_light::traits::SenseInput;
///
/// let peripherals = Peripherals::take()?;
/// let adc1 = AdcDriver::new(peripherals.adc1)?;
/// let mut red = Esp32Sense::new(&adc1, peripherals.pins.gpio0)?;
///
/// println!("red sense: {}", red.read_raw()?);
/// ```
pub struct Esp32Sense<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    channel: AdcChannelDriver<'d, T, M>,
}

impl<'d, T, M> Esp32Sense<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    /// Creates a sense channel on `pin`.
    ///
    /// # Arguments
    ///
    /// * `adc` - ADC driver, or a reference to one that outlives this channel
    /// * `pin` - ADC-capable GPIO
    ///
    /// # Errors
    ///
    /// Returns an error if ADC channel initialization fails.
    pub fn new(adc: M, pin: impl Peripheral<P = T> + 'd) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }
}

impl<'d, T, M> SenseInput for Esp32Sense<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, EspError> {
        self.channel.read()
    }
}
