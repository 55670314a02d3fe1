//! Event identifiers and the single-listener dispatcher.
//!
//! Every [`Event`] has at most one registered callback. Connecting a new
//! callback for an event replaces the previous one; there is no way to have
//! several listeners for the same event. Emitting runs the callback inline.
//!
//! Callbacks are owned by the dispatcher, which is owned by the controller,
//! so a callback cannot reach back into the controller and emit further
//! events. Call depth from an emit is therefore always one.
//!
//! # Example
//!
//! ```rust
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use traffic_light::events::{Event, EventDispatcher};
//!
//! let hits = Rc::new(Cell::new(0));
//! let mut events = EventDispatcher::new();
//!
//! let counter = hits.clone();
//! events.connect(Event::CyclePhaseChanged, move || counter.set(counter.get() + 1));
//!
//! events.emit(Event::CyclePhaseChanged);
//! events.emit(Event::CycleFinished); // no listener, ignored
//! assert_eq!(hits.get(), 1);
//! ```

use alloc::boxed::Box;
use core::fmt;

/// Everything the controller can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Event {
    /// The red light's sense pin reports a defect.
    RedLightDefect,
    /// The yellow light's sense pin reports a defect.
    YellowLightDefect,
    /// The green light's sense pin reports a defect.
    GreenLightDefect,
    /// The red light reads clean again (auto-recovery only).
    RedLightRecovered,
    /// The yellow light reads clean again (auto-recovery only).
    YellowLightRecovered,
    /// The green light reads clean again (auto-recovery only).
    GreenLightRecovered,
    /// The cycle moved to another phase.
    CyclePhaseChanged,
    /// The cycle completed a full pass through its phases.
    CycleFinished,
    /// The cycle completed its last allowed pass and stopped.
    CycleReachedRepetitionsLimit,
    /// The activity cycle toggled (emitted after the directional event).
    ActivityStateChanged,
    /// The activity cycle became active.
    ActivityToActive,
    /// The activity cycle became inactive.
    ActivityToInactive,
}

impl Event {
    /// Number of distinct events.
    pub const COUNT: usize = 12;

    /// All events in declaration order.
    pub const ALL: [Event; Self::COUNT] = [
        Event::RedLightDefect,
        Event::YellowLightDefect,
        Event::GreenLightDefect,
        Event::RedLightRecovered,
        Event::YellowLightRecovered,
        Event::GreenLightRecovered,
        Event::CyclePhaseChanged,
        Event::CycleFinished,
        Event::CycleReachedRepetitionsLimit,
        Event::ActivityStateChanged,
        Event::ActivityToActive,
        Event::ActivityToInactive,
    ];

    /// Position of this event in [`Event::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the event name in `snake_case`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Event::RedLightDefect => "red_light_defect",
            Event::YellowLightDefect => "yellow_light_defect",
            Event::GreenLightDefect => "green_light_defect",
            Event::RedLightRecovered => "red_light_recovered",
            Event::YellowLightRecovered => "yellow_light_recovered",
            Event::GreenLightRecovered => "green_light_recovered",
            Event::CyclePhaseChanged => "cycle_phase_changed",
            Event::CycleFinished => "cycle_finished",
            Event::CycleReachedRepetitionsLimit => "cycle_reached_repetitions_limit",
            Event::ActivityStateChanged => "activity_state_changed",
            Event::ActivityToActive => "activity_to_active",
            Event::ActivityToInactive => "activity_to_inactive",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered event callback.
pub type Callback = Box<dyn FnMut()>;

/// Fixed registry of one optional callback per [`Event`].
pub struct EventDispatcher {
    slots: [Option<Callback>; Event::COUNT],
}

impl EventDispatcher {
    /// Creates a dispatcher with no callbacks.
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    /// Registers `callback` for `event`, replacing any previous one.
    pub fn connect(&mut self, event: Event, callback: impl FnMut() + 'static) {
        self.slots[event.index()] = Some(Box::new(callback));
    }

    /// Removes the callback for `event`. No-op if none is registered.
    pub fn disconnect(&mut self, event: Event) {
        self.slots[event.index()] = None;
    }

    /// Whether a callback is registered for `event`.
    pub fn is_connected(&self, event: Event) -> bool {
        self.slots[event.index()].is_some()
    }

    /// Runs the callback for `event`, if any.
    pub fn emit(&mut self, event: Event) {
        if let Some(callback) = self.slots[event.index()].as_mut() {
            callback();
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Event::ALL.iter().filter(|e| self.is_connected(**e)))
            .finish()
    }
}
