//! ESP32-C3 SuperMini hardware abstraction layer for a traffic light.
//!
//! Lights are driven through `esp_idf_hal::gpio::PinDriver` outputs, which
//! implement `embedded_hal::digital::OutputPin` and plug into
//! [`GpioPort`](crate::hal::GpioPort). Sense channels read a photodiode or
//! current shunt per light through the one-shot ADC driver.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Lights**: three LED modules behind low-side MOSFETs
//! - **Sense**: one ADC1 channel per light
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod clock;
mod sense;

pub use clock::Esp32Clock;
pub use sense::Esp32Sense;

/// Pin assignments for SuperMini ESP32-C3.
///
/// Only GPIO0-4 are on ADC1, so the sense lines use those and the light
/// outputs sit on GPIO5-7.
pub mod pins {
    use crate::traits::PinId;

    // =========================================================================
    // Light outputs
    // =========================================================================

    /// Red light output
    pub const RED: PinId = 5;

    /// Yellow light output
    pub const YELLOW: PinId = 6;

    /// Green light output
    pub const GREEN: PinId = 7;

    // =========================================================================
    // Sense inputs (ADC1)
    // =========================================================================

    /// Red light sense
    pub const RED_SENSE: PinId = 0;

    /// Yellow light sense
    pub const YELLOW_SENSE: PinId = 1;

    /// Green light sense
    pub const GREEN_SENSE: PinId = 2;
}
