//! Phase sequencing state machine.
//!
//! A [`Cycle`] walks through an owned table of [`Phase`]s. Each phase holds
//! its light [`Pattern`] for a fixed duration; once the duration has elapsed
//! the next call to [`Cycle::update`] moves to the following phase. After the
//! last phase the cycle wraps to phase 0 and counts one repetition. With a
//! nonzero repetition limit the cycle disables itself when the limit is
//! reached.
//!
//! # One-shot flags
//!
//! Transitions are reported through three one-shot flags:
//! [`has_phase_changed`](Cycle::has_phase_changed),
//! [`has_finished`](Cycle::has_finished) and
//! [`has_reached_repetitions_limit`](Cycle::has_reached_repetitions_limit).
//! A flag only ever describes the most recent `update()` call (every update
//! clears all flags before evaluating), and reading a flag clears it. So each
//! transition is observable exactly once, and only until the next update.
//!
//! # Example
//!
//! ```rust
//! use traffic_light::cycle::{Cycle, Pattern, Phase};
//!
//! let mut cycle = Cycle::new();
//! cycle.set_phases(
//!     &[
//!         Phase::new(500, Pattern::RED),
//!         Phase::new(500, Pattern::GREEN),
//!     ],
//!     0,
//! );
//! cycle.enable(0);
//!
//! cycle.update(499);
//! assert!(!cycle.has_phase_changed());
//!
//! cycle.update(500);
//! assert!(cycle.has_phase_changed());
//! assert_eq!(cycle.current_phase().map(|p| p.pattern), Some(Pattern::GREEN));
//! ```

use alloc::vec::Vec;

use crate::traits::elapsed_ms;

/// On/off state of the three lights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    /// Red light on.
    pub red: bool,
    /// Yellow light on.
    pub yellow: bool,
    /// Green light on.
    pub green: bool,
}

impl Pattern {
    /// All lights off.
    pub const OFF: Self = Self::new(false, false, false);
    /// Only red on.
    pub const RED: Self = Self::new(true, false, false);
    /// Red and yellow on (prepare to go).
    pub const RED_YELLOW: Self = Self::new(true, true, false);
    /// Only yellow on.
    pub const YELLOW: Self = Self::new(false, true, false);
    /// Only green on.
    pub const GREEN: Self = Self::new(false, false, true);

    /// Creates a pattern from the red, yellow and green states.
    #[inline]
    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }

    /// Returns the states as `[red, yellow, green]`.
    #[inline]
    pub const fn as_array(&self) -> [bool; 3] {
        [self.red, self.yellow, self.green]
    }

    /// Returns `true` if no light is on.
    #[inline]
    pub const fn is_off(&self) -> bool {
        !self.red && !self.yellow && !self.green
    }
}

impl From<[bool; 3]> for Pattern {
    fn from([red, yellow, green]: [bool; 3]) -> Self {
        Self::new(red, yellow, green)
    }
}

/// One step of the repeating sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    /// How long the pattern is shown, in milliseconds.
    pub duration_ms: u32,
    /// Lights shown during this phase.
    pub pattern: Pattern,
}

impl Phase {
    /// Creates a phase.
    #[inline]
    pub const fn new(duration_ms: u32, pattern: Pattern) -> Self {
        Self {
            duration_ms,
            pattern,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct CycleFlags {
    phase_changed: bool,
    finished: bool,
    reached_repetitions_limit: bool,
}

/// Timer-driven phase sequencer.
///
/// Owns its phase table. [`set_phases`](Self::set_phases) copies the caller's
/// slice, so the caller is free to drop or reuse its buffer afterwards.
///
/// Time never advances on its own: every time-dependent call takes the
/// current `now_ms` reading from a wrapping 32-bit millisecond clock.
#[derive(Clone, Debug, Default)]
pub struct Cycle {
    enabled: bool,
    phases: Vec<Phase>,
    phase_index: usize,
    repetitions_limit: u32,
    repetitions_count: u32,
    last_transition_ms: u32,
    flags: CycleFlags,
}

impl Cycle {
    /// Creates an empty, disabled cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cycle is running.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The phase currently shown, or `None` if the table is empty.
    pub fn current_phase(&self) -> Option<&Phase> {
        self.phases.get(self.phase_index)
    }

    /// Index of the current phase.
    #[inline]
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Number of phases in the table.
    #[inline]
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// The installed phase table.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Full passes completed since the last [`enable`](Self::enable).
    #[inline]
    pub fn repetitions_count(&self) -> u32 {
        self.repetitions_count
    }

    /// Configured repetition limit (0 = unlimited).
    #[inline]
    pub fn repetitions_limit(&self) -> u32 {
        self.repetitions_limit
    }

    /// Returns and clears the phase-changed flag.
    pub fn has_phase_changed(&mut self) -> bool {
        core::mem::take(&mut self.flags.phase_changed)
    }

    /// Returns and clears the finished flag (a full pass completed).
    pub fn has_finished(&mut self) -> bool {
        core::mem::take(&mut self.flags.finished)
    }

    /// Returns and clears the repetition-limit flag.
    pub fn has_reached_repetitions_limit(&mut self) -> bool {
        core::mem::take(&mut self.flags.reached_repetitions_limit)
    }

    /// Sets how many full passes run before the cycle stops (0 = unlimited).
    ///
    /// Checked the next time a pass completes.
    pub fn set_repetitions_limit(&mut self, repetitions_limit: u32) {
        self.repetitions_limit = repetitions_limit;
    }

    /// Replaces the phase table.
    ///
    /// An empty slice leaves the cycle without phases; `update()` then does
    /// nothing. The index restarts at phase 0 and, if the cycle is running,
    /// phase 0 gets its full duration starting at `now_ms`.
    pub fn set_phases(&mut self, phases: &[Phase], now_ms: u32) {
        self.phases = phases.to_vec();
        self.phase_index = 0;
        if self.enabled {
            self.last_transition_ms = now_ms;
        }
    }

    /// Starts the cycle from phase 0 with a fresh repetition count.
    pub fn enable(&mut self, now_ms: u32) {
        self.enabled = true;
        self.phase_index = 0;
        self.repetitions_count = 0;
        self.flags = CycleFlags::default();
        self.last_transition_ms = now_ms;
    }

    /// Stops the cycle and rewinds to phase 0. The phase table is kept.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.phase_index = 0;
    }

    /// Advances at most one phase if the current phase's duration has elapsed.
    pub fn update(&mut self, now_ms: u32) {
        self.flags = CycleFlags::default();

        if !self.enabled {
            return;
        }
        let Some(phase) = self.phases.get(self.phase_index) else {
            return;
        };

        if elapsed_ms(now_ms, self.last_transition_ms) < phase.duration_ms {
            return;
        }

        self.phase_index += 1;
        self.flags.phase_changed = true;
        self.last_transition_ms = now_ms;

        if self.phase_index >= self.phases.len() {
            self.flags.finished = true;
            self.phase_index = 0;
            self.repetitions_count = self.repetitions_count.saturating_add(1);

            if self.repetitions_limit > 0 && self.repetitions_count >= self.repetitions_limit {
                self.flags.reached_repetitions_limit = true;
                self.disable();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
