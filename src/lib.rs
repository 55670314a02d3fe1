//! # traffic-light
//!
//! A traffic light controller for microcontrollers, with a desktop simulator.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for digital outputs, analog sense inputs and time
//! - **Phase cycle**: Timed light patterns with an optional repetition limit
//! - **Activity cycle**: Alternates between running and resting the phase cycle
//! - **Defect detection**: Per-light sense pins with optional auto-recovery
//! - **Events**: One callback per event, fired synchronously from `update()`
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions (`IoPort`, `Clock`, `SenseInput`)
//! - `cycle` - Phase table sequencing
//! - `activity` - Active/inactive toggling
//! - `events` - Event enum and callback dispatcher
//! - `traffic_light` - Main controller that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use traffic_light::{Event, TrafficLight, TrafficLightConfig};
//! use traffic_light::hal::{MockClock, MockPort};
//!
//! // Create controller with a mock port
//! let config = TrafficLightConfig::standard().with_repetitions_limit(1);
//! let mut light =
//!     TrafficLight::with_config(MockPort::new(), MockClock::new(), [2, 3, 4], &config).unwrap();
//!
//! light.register_event(Event::CycleReachedRepetitionsLimit, || println!("done"));
//! light.enable_cycle();
//!
//! // Update in your main loop
//! for _ in 0..1400 {
//!     light.clock_mut().advance(10); // 10ms tick
//!     light.update().unwrap();
//! }
//!
//! assert!(!light.is_cycle_enabled());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Active/inactive toggling that gates the phase cycle.
pub mod activity;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Light patterns, phases and the phase cycle state machine.
pub mod cycle;
/// Event identifiers and the callback dispatcher.
pub mod events;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Main traffic light controller that coordinates cycles, outputs and defect detection.
pub mod traffic_light;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use activity::{ActivityCycle, ActivityState};
pub use cycle::{Cycle, Pattern, Phase};
pub use events::{Callback, Event, EventDispatcher};
pub use traffic_light::{Light, TrafficLight, TrafficLightState};
pub use traits::{elapsed_ms, Clock, IoPort, Level, PinId, SenseInput};

// Config re-exports
pub use config::{ActivityConfig, DefectConfig, TrafficLightConfig};

#[cfg(feature = "serde-json-core")]
pub use config::parse_config;
