//! [`IoPort`] over `embedded-hal` output pins and [`SenseInput`] channels.
//!
//! Boards whose HAL implements `embedded_hal::digital::OutputPin` can drive
//! the lights through a [`GpioPort`]. Each pin object is registered under the
//! [`PinId`] the controller will use for it. Sense channels are registered
//! the same way; use `Box<dyn SenseInput<Error = E>>` when the channels have
//! different concrete types.
//!
//! # Example
//!
//! ```rust,ignore
//! use traffic_light::hal::GpioPort;
//! use traffic_light::TrafficLight;
//!
//! let mut port = GpioPort::new();
//! port.add_output(2, red_pin)?;
//! port.add_output(3, yellow_pin)?;
//! port.add_output(4, green_pin)?;
//! port.add_sense(0, red_adc_channel)?;
//!
//! let mut light = TrafficLight::new(port, clock, [2, 3, 4])?;
//! light.set_test_pins([Some(0), None, None])?;
//! ```

use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec as HVec;

use crate::traits::{IoPort, Level, PinId, SenseInput};

/// Maximum number of output pins or sense channels per port.
pub const MAX_CHANNELS: usize = 8;

/// Errors from a [`GpioPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError<EO, ES> {
    /// No output or sense channel is registered under this id.
    UnknownPin(PinId),
    /// The port already holds [`MAX_CHANNELS`] channels of this kind.
    Full,
    /// Driving an output failed.
    Output(EO),
    /// Sampling a sense channel failed.
    Sense(ES),
}

/// Port built from individually registered pins.
pub struct GpioPort<O, S> {
    outputs: HVec<(PinId, O), MAX_CHANNELS>,
    senses: HVec<(PinId, S), MAX_CHANNELS>,
}

impl<O, S> GpioPort<O, S>
where
    O: OutputPin,
    S: SenseInput,
{
    /// Creates an empty port.
    pub fn new() -> Self {
        Self {
            outputs: HVec::new(),
            senses: HVec::new(),
        }
    }

    /// Registers an output pin under `id`.
    pub fn add_output(&mut self, id: PinId, pin: O) -> Result<(), GpioError<O::Error, S::Error>> {
        self.outputs.push((id, pin)).map_err(|_| GpioError::Full)
    }

    /// Registers a sense channel under `id`.
    pub fn add_sense(&mut self, id: PinId, sense: S) -> Result<(), GpioError<O::Error, S::Error>> {
        self.senses.push((id, sense)).map_err(|_| GpioError::Full)
    }

    fn output(&mut self, id: PinId) -> Option<&mut O> {
        self.outputs
            .iter_mut()
            .find(|(pin, _)| *pin == id)
            .map(|(_, o)| o)
    }

    fn sense(&mut self, id: PinId) -> Option<&mut S> {
        self.senses
            .iter_mut()
            .find(|(pin, _)| *pin == id)
            .map(|(_, s)| s)
    }
}

impl<O, S> Default for GpioPort<O, S>
where
    O: OutputPin,
    S: SenseInput,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<O, S> IoPort for GpioPort<O, S>
where
    O: OutputPin,
    S: SenseInput,
{
    type Error = GpioError<O::Error, S::Error>;

    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        // Pin direction is fixed when the HAL pin object is created
        match self.output(pin) {
            Some(_) => Ok(()),
            None => Err(GpioError::UnknownPin(pin)),
        }
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), Self::Error> {
        match self.sense(pin) {
            Some(_) => Ok(()),
            None => Err(GpioError::UnknownPin(pin)),
        }
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        let output = self.output(pin).ok_or(GpioError::UnknownPin(pin))?;
        output
            .set_state(PinState::from(level.is_high()))
            .map_err(GpioError::Output)
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, Self::Error> {
        let sense = self.sense(pin).ok_or(GpioError::UnknownPin(pin))?;
        sense.read_raw().map_err(GpioError::Sense)
    }
}
