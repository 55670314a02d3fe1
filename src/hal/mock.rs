//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware traits, enabling
//! development and testing on desktop without a board.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPort`] | [`IoPort`] | Records pin setup and output levels, serves analog values |
//! | [`MockSense`] | [`SenseInput`] | Fixed analog reading |
//! | [`MockClock`] | [`Clock`] | Controllable wrapping time source |
//!
//! # Example
//!
//! ```rust
//! use traffic_light::{Pattern, TrafficLight};
//! use traffic_light::hal::{MockClock, MockPort};
//!
//! let mut light = TrafficLight::new(MockPort::new(), MockClock::new(), [2, 3, 4]).unwrap();
//! light.set_pattern(Pattern::YELLOW);
//! light.update().unwrap();
//!
//! // Verify via the port
//! assert!(!light.port().is_high(2));
//! assert!(light.port().is_high(3));
//! assert!(!light.port().is_high(4));
//! ```
//!
//! [`IoPort`]: crate::traits::IoPort
//! [`SenseInput`]: crate::traits::SenseInput
//! [`Clock`]: crate::traits::Clock

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::traits::{Clock, IoPort, Level, PinId, SenseInput};

// ============================================================================
// Port Mock
// ============================================================================

/// Mock I/O port for testing.
///
/// Records pin configuration and the last level written to each pin. Analog
/// values are set per pin with [`set_analog`](Self::set_analog); unset pins
/// read 0. Set `fail` to make every operation return `Err(())`.
///
/// # Example
///
/// ```rust
/// use traffic_light::hal::MockPort;
/// use traffic_light::traits::{IoPort, Level};
///
/// let mut port = MockPort::new();
/// port.write_digital(5, Level::High).unwrap();
/// assert_eq!(port.level(5), Some(Level::High));
/// assert_eq!(port.write_count, 1);
///
/// assert_eq!(port.read_analog(9).unwrap(), 0);
/// port.set_analog(9, 700);
/// assert_eq!(port.read_analog(9).unwrap(), 700);
/// assert_eq!(port.read_count, 2);
/// ```
#[derive(Debug, Default)]
pub struct MockPort {
    /// Pins configured as outputs, in call order.
    pub configured_outputs: Vec<PinId>,
    /// Pins configured as inputs, in call order.
    pub configured_inputs: Vec<PinId>,
    /// Last level written per pin.
    pub levels: BTreeMap<PinId, Level>,
    /// Analog value served per pin.
    pub analog: BTreeMap<PinId, u16>,
    /// Number of `write_digital` calls.
    pub write_count: usize,
    /// Number of `read_analog` calls.
    pub read_count: usize,
    /// When set, every operation fails.
    pub fail: bool,
}

impl MockPort {
    /// Creates a new mock port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock port whose operations all fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Sets the analog value returned for `pin`.
    pub fn set_analog(&mut self, pin: PinId, value: u16) {
        self.analog.insert(pin, value);
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: PinId) -> Option<Level> {
        self.levels.get(&pin).copied()
    }

    /// Whether `pin` was last driven high.
    pub fn is_high(&self, pin: PinId) -> bool {
        self.level(pin).is_some_and(Level::is_high)
    }

    fn check(&self) -> Result<(), ()> {
        if self.fail {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl IoPort for MockPort {
    type Error = ();

    fn configure_output(&mut self, pin: PinId) -> Result<(), ()> {
        self.check()?;
        self.configured_outputs.push(pin);
        Ok(())
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), ()> {
        self.check()?;
        self.configured_inputs.push(pin);
        Ok(())
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), ()> {
        self.check()?;
        self.levels.insert(pin, level);
        self.write_count += 1;
        Ok(())
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, ()> {
        self.check()?;
        self.read_count += 1;
        Ok(self.analog.get(&pin).copied().unwrap_or(0))
    }
}

// ============================================================================
// Sense Mock
// ============================================================================

/// Mock analog channel returning a fixed value.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSense {
    /// Value returned by `read_raw`.
    pub value: u16,
}

impl MockSense {
    /// Creates a channel reading `value`.
    pub fn new(value: u16) -> Self {
        Self { value }
    }
}

impl SenseInput for MockSense {
    type Error = ();

    fn read_raw(&mut self) -> Result<u16, ()> {
        Ok(self.value)
    }
}

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock clock for testing.
///
/// Provides a controllable time source. Advancing past `u32::MAX` wraps,
/// like a real millisecond counter.
///
/// # Example
///
/// ```rust
/// use traffic_light::hal::MockClock;
/// use traffic_light::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
///
/// clock.set(u32::MAX);
/// clock.advance(2);
/// assert_eq!(clock.now_ms(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u32,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Creates a mock clock starting at `ms`.
    pub fn starting_at(ms: u32) -> Self {
        Self { current_ms: ms }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u32) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration, wrapping at `u32::MAX`.
    pub fn advance(&mut self, ms: u32) {
        self.current_ms = self.current_ms.wrapping_add(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.current_ms
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockPort Tests
    // =========================================================================

    #[test]
    fn mock_port_default() {
        let port = MockPort::new();
        assert!(port.configured_outputs.is_empty());
        assert!(port.configured_inputs.is_empty());
        assert_eq!(port.write_count, 0);
        assert_eq!(port.read_count, 0);
        assert!(!port.fail);
    }

    #[test]
    fn mock_port_configure() {
        let mut port = MockPort::new();
        port.configure_output(1).unwrap();
        port.configure_output(2).unwrap();
        port.configure_input(7).unwrap();
        assert_eq!(port.configured_outputs, [1, 2]);
        assert_eq!(port.configured_inputs, [7]);
    }

    #[test]
    fn mock_port_levels() {
        let mut port = MockPort::new();
        assert_eq!(port.level(3), None);
        assert!(!port.is_high(3));

        port.write_digital(3, Level::High).unwrap();
        assert!(port.is_high(3));
        port.write_digital(3, Level::Low).unwrap();
        assert_eq!(port.level(3), Some(Level::Low));
        assert_eq!(port.write_count, 2);
    }

    #[test]
    fn mock_port_failing() {
        let mut port = MockPort::new().failing();
        assert!(port.configure_output(1).is_err());
        assert!(port.configure_input(1).is_err());
        assert!(port.write_digital(1, Level::High).is_err());
        assert!(port.read_analog(1).is_err());
        assert_eq!(port.write_count, 0);
    }

    // =========================================================================
    // MockSense Tests
    // =========================================================================

    #[test]
    fn mock_sense_reads_value() {
        let mut sense = MockSense::new(42);
        assert_eq!(sense.read_raw(), Ok(42));
        sense.value = 7;
        assert_eq!(sense.read_raw(), Ok(7));
    }

    // =========================================================================
    // MockClock Tests
    // =========================================================================

    #[test]
    fn mock_clock_default() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn mock_clock_set_and_advance() {
        let mut clock = MockClock::starting_at(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 350);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn mock_clock_wraps() {
        let mut clock = MockClock::starting_at(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_ms(), 1);
    }
}
