//! Millisecond clock over the ESP-IDF high resolution timer.

use crate::traits::Clock;

fn timer_us() -> i64 {
    // SAFETY: esp_timer is started by ESP-IDF before `main` and the read has no side effects
    unsafe { esp_idf_hal::sys::esp_timer_get_time() }
}

/// [`Clock`] that counts from the moment it was created.
///
/// `esp_timer_get_time()` reports microseconds since boot as an `i64`. The
/// controller only needs differences, so the clock keeps its own epoch and
/// reports `(now - epoch) / 1000` narrowed to `u32`. Like `millis()` it wraps
/// after ~49.7 days; [`elapsed_ms`](crate::traits::elapsed_ms) handles the wrap.
#[derive(Debug, Clone, Copy)]
pub struct Esp32Clock {
    epoch_us: i64,
}

impl Esp32Clock {
    /// Clock reading 0 now.
    pub fn new() -> Self {
        Self {
            epoch_us: timer_us(),
        }
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Esp32Clock {
    fn now_ms(&self) -> u32 {
        ((timer_us() - self.epoch_us) / 1000) as u32
    }
}
