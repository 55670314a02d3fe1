//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstractions that allow the controller to:
//! - Run on different hardware (ESP32, any `embedded-hal` board, desktop mock)
//! - Be tested deterministically with a controllable clock
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`IoPort`]: Pin setup, digital light outputs and analog sense inputs
//! - [`SenseInput`]: One analog channel, composable into a port
//! - [`Clock`]: Wrapping millisecond time source

pub mod hardware;

pub use hardware::*;
