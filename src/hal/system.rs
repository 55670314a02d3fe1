//! Desktop clock backed by `std::time::Instant`.

use std::time::Instant;

use crate::traits::Clock;

/// Wall-clock time source for desktop builds.
///
/// Reports milliseconds since construction, truncated to 32 bits so it
/// wraps after ~49.7 days like an embedded counter.
///
/// # Example
///
/// ```rust
/// use traffic_light::hal::SystemClock;
/// use traffic_light::traits::Clock;
///
/// let clock = SystemClock::new();
/// assert!(clock.now_ms() < 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock starting at 0 now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the intended wrap
        self.epoch.elapsed().as_millis() as u32
    }
}
