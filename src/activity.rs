//! Active/inactive duty-cycle state machine.
//!
//! An [`ActivityCycle`] alternates between [`ActivityState::Active`] and
//! [`ActivityState::Inactive`], holding each state for its own configured
//! duration. The controller uses it to run the phase cycle only during the
//! active part of a longer period (e.g. flash for two seconds, rest for
//! three).
//!
//! The state-changed flag follows the same one-shot contract as the
//! [`Cycle`](crate::cycle::Cycle) flags: it reflects only the most recent
//! `update()` call and is cleared when read.
//!
//! # Example
//!
//! ```rust
//! use traffic_light::activity::{ActivityCycle, ActivityState};
//!
//! let mut activity = ActivityCycle::new();
//! activity.set_times(2000, 3000);
//! activity.enable(0);
//! assert_eq!(activity.state(), ActivityState::Active);
//!
//! activity.update(2001);
//! assert_eq!(activity.state(), ActivityState::Inactive);
//! assert!(activity.has_state_changed());
//! assert!(!activity.has_state_changed());
//! ```

use crate::traits::elapsed_ms;

/// State of an [`ActivityCycle`].
///
/// Defaults to [`Active`](Self::Active), which is also the state a disabled
/// activity cycle rests in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivityState {
    /// The phase cycle may run.
    #[default]
    Active,
    /// The phase cycle is paused.
    Inactive,
}

impl ActivityState {
    /// Returns the opposite state.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            ActivityState::Active => ActivityState::Inactive,
            ActivityState::Inactive => ActivityState::Active,
        }
    }

    /// Returns the state as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Active => "active",
            ActivityState::Inactive => "inactive",
        }
    }
}

/// Timer-driven active/inactive toggler.
#[derive(Clone, Debug, Default)]
pub struct ActivityCycle {
    enabled: bool,
    state: ActivityState,
    state_changed: bool,
    active_time_ms: u32,
    inactive_time_ms: u32,
    last_transition_ms: u32,
}

impl ActivityCycle {
    /// Creates a disabled activity cycle with zero durations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the activity cycle is running.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// Configured active duration in milliseconds.
    #[inline]
    pub fn active_time_ms(&self) -> u32 {
        self.active_time_ms
    }

    /// Configured inactive duration in milliseconds.
    #[inline]
    pub fn inactive_time_ms(&self) -> u32 {
        self.inactive_time_ms
    }

    /// Returns and clears the state-changed flag.
    pub fn has_state_changed(&mut self) -> bool {
        core::mem::take(&mut self.state_changed)
    }

    /// Sets both durations. Does not touch the current state or timer.
    pub fn set_times(&mut self, active_time_ms: u32, inactive_time_ms: u32) {
        self.active_time_ms = active_time_ms;
        self.inactive_time_ms = inactive_time_ms;
    }

    /// Starts in the active state, timed from `now_ms`.
    pub fn enable(&mut self, now_ms: u32) {
        self.enabled = true;
        self.state = ActivityState::Active;
        self.state_changed = false;
        self.last_transition_ms = now_ms;
    }

    /// Stops toggling and rests in the active state.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.state = ActivityState::Active;
    }

    fn target_ms(&self) -> u32 {
        match self.state {
            ActivityState::Active => self.active_time_ms,
            ActivityState::Inactive => self.inactive_time_ms,
        }
    }

    /// Toggles once if the current state's duration has elapsed.
    pub fn update(&mut self, now_ms: u32) {
        self.state_changed = false;

        if !self.enabled {
            return;
        }
        if elapsed_ms(now_ms, self.last_transition_ms) < self.target_ms() {
            return;
        }

        self.state = self.state.toggled();
        self.state_changed = true;
        self.last_transition_ms = now_ms;
    }
}
