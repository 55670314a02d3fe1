//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `system`: `std` wall clock for desktop runs
//! - `gpio`: Port over `embedded-hal` output pins (requires `embedded-hal` feature)
//! - `esp32`: ESP32-C3 clock and ADC sense channels (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod system;

#[cfg(feature = "embedded-hal")]
pub mod gpio;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "std")]
pub use system::SystemClock;

#[cfg(feature = "embedded-hal")]
pub use gpio::{GpioError, GpioPort};

#[cfg(feature = "esp32")]
pub use esp32::*;
