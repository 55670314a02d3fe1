//! Hardware abstraction traits for digital outputs, analog sense inputs and time.
//!
//! This module defines the hardware interfaces that allow the traffic light
//! controller to run on different platforms (ESP32, desktop mocks, any
//! `embedded-hal` board).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`IoPort`] | Pin configuration, digital writes and analog reads |
//! | [`SenseInput`] | A single analog channel (e.g. one ADC pin) |
//! | [`Clock`] | Wrapping millisecond time source |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For real boards, use `hal::gpio::GpioPort`
//! (requires `embedded-hal` feature) or the ESP32 pieces from `hal::esp32`
//! (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use traffic_light::traits::{IoPort, Level};
//! use traffic_light::hal::MockPort;
//!
//! let mut port = MockPort::new();
//! port.configure_output(13).unwrap();
//! port.write_digital(13, Level::High).unwrap();
//! assert!(port.is_high(13));
//!
//! port.set_analog(2, 512);
//! assert_eq!(port.read_analog(2).unwrap(), 512);
//! ```

/// Identifier of a physical pin.
pub type PinId = u8;

/// Drive level of a digital output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Output driven low (light off).
    #[default]
    Low,
    /// Output driven high (light on).
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(on: bool) -> Self {
        if on {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital/analog I/O port used by the controller.
///
/// Implement this trait for your board. The controller configures the three
/// light pins as outputs at construction, configures sense pins as inputs when
/// they are assigned, writes every light once per tick and samples sense pins
/// at the defect scan rate.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use traffic_light::traits::{IoPort, Level, PinId};
///
/// struct ArduinoPort;
///
/// impl IoPort for ArduinoPort {
///     type Error = ();
///
///     fn configure_output(&mut self, pin: PinId) -> Result<(), ()> {
///         unsafe { pinMode(pin, OUTPUT) };
///         Ok(())
///     }
///
///     fn configure_input(&mut self, pin: PinId) -> Result<(), ()> {
///         unsafe { pinMode(pin, INPUT) };
///         Ok(())
///     }
///
///     fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), ()> {
///         unsafe { digitalWrite(pin, level.is_high() as u8) };
///         Ok(())
///     }
///
///     fn read_analog(&mut self, pin: PinId) -> Result<u16, ()> {
///         Ok(unsafe { analogRead(pin) })
///     }
/// }
/// ```
pub trait IoPort {
    /// Error type for port operations.
    type Error;

    /// Configure `pin` as a digital output.
    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Configure `pin` as an (analog) input.
    fn configure_input(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Drive `pin` to `level`.
    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error>;

    /// Sample the raw analog value on `pin`.
    fn read_analog(&mut self, pin: PinId) -> Result<u16, Self::Error>;
}

/// A single analog sense channel.
///
/// Used by `GpioPort` to attach one ADC channel per sense pin. Boxed
/// channels are supported so channels of different concrete types can
/// share one port.
pub trait SenseInput {
    /// Error type for sampling.
    type Error;

    /// Sample the raw value.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

impl<T: SenseInput + ?Sized> SenseInput for alloc::boxed::Box<T> {
    type Error = T::Error;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        (**self).read_raw()
    }
}

/// Time source trait for `no_std` compatibility.
///
/// Provides a millisecond counter that wraps at `u32::MAX`, the same way
/// a 32-bit `millis()` counter does on a microcontroller. All elapsed time
/// computations in this crate go through [`elapsed_ms`], so the wrap is
/// harmless.
///
/// # Example
///
/// ```rust
/// use traffic_light::traits::Clock;
/// use traffic_light::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Monotonic modulo 2^32.
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed from `since` to `now` on a wrapping 32-bit clock.
///
/// ```rust
/// use traffic_light::traits::elapsed_ms;
///
/// assert_eq!(elapsed_ms(1500, 1000), 500);
/// // The counter wrapped between the two samples
/// assert_eq!(elapsed_ms(5, u32::MAX - 4), 10);
/// ```
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
