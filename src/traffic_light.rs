//! Main traffic light controller that ties everything together.
//!
//! This module provides [`TrafficLight`], the composition root that owns the
//! phase [`Cycle`], the [`ActivityCycle`], the [`EventDispatcher`], the
//! current light pattern and the per-light defect state.
//!
//! # Overview
//!
//! Every call to [`TrafficLight::update`] runs one tick in a fixed order:
//!
//! 1. Update the activity cycle (if enabled). On a toggle to active, the
//!    phase cycle is (re)started; on a toggle to inactive, it is stopped and
//!    the lights go dark if auto-lights-off is on.
//! 2. Update the phase cycle (if enabled and it has phases) and adopt the new
//!    phase's pattern on a phase change.
//! 3. Write the pattern to the three light outputs.
//! 4. Scan the sense pins for defective lights (rate-limited).
//!
//! Events are emitted inline as each step observes a transition.
//!
//! # Polling Contract
//!
//! The controller has no scheduler of its own. Call `update()` from your main
//! loop at an interval much shorter than the shortest phase or activity
//! duration (10-20ms is typical). Each call processes at most one phase
//! advance and one activity toggle, so a stalled loop delays transitions
//! instead of skipping phases.
//!
//! # Example
//!
//! ```rust
//! use traffic_light::{Event, Pattern, Phase, TrafficLight};
//! use traffic_light::hal::{MockClock, MockPort};
//!
//! let mut light = TrafficLight::new(MockPort::new(), MockClock::new(), [2, 3, 4]).unwrap();
//! light.set_cycle_phases(&[
//!     Phase::new(1000, Pattern::RED),
//!     Phase::new(1000, Pattern::GREEN),
//! ]);
//! light.register_event(Event::CyclePhaseChanged, || println!("phase changed"));
//! light.enable_cycle();
//!
//! // Main loop: one tick every 10ms
//! for _ in 0..150 {
//!     light.clock_mut().advance(10);
//!     light.update().unwrap();
//! }
//!
//! assert_eq!(light.pattern(), Pattern::GREEN);
//! assert!(light.port().is_high(4));
//! ```
//!
//! # Defect Detection
//!
//! Each light may have a sense pin. While a light is commanded on, a sense
//! reading above the defect threshold marks it defective and emits its
//! `*LightDefect` event once. With auto-recovery enabled, a later clean
//! reading emits `*LightRecovered` and marks it intact again; otherwise it
//! stays defective until [`TrafficLight::reset_defect`] is called.

use log::{debug, info, trace, warn};

use crate::activity::{ActivityCycle, ActivityState};
use crate::config::{DefectConfig, TrafficLightConfig};
use crate::cycle::{Cycle, Pattern, Phase};
use crate::events::{Event, EventDispatcher};
use crate::traits::{elapsed_ms, Clock, IoPort, Level, PinId};

/// One of the three lights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Light {
    /// Top light.
    Red,
    /// Middle light.
    Yellow,
    /// Bottom light.
    Green,
}

impl Light {
    /// All lights, top to bottom.
    pub const ALL: [Light; 3] = [Light::Red, Light::Yellow, Light::Green];

    /// Position of the light (0: red, 1: yellow, 2: green).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Light at `index`, or `None` if out of range.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Light::Red),
            1 => Some(Light::Yellow),
            2 => Some(Light::Green),
            _ => None,
        }
    }

    /// Returns the light name in lowercase.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Light::Red => "red",
            Light::Yellow => "yellow",
            Light::Green => "green",
        }
    }

    /// Event emitted when this light is found defective.
    pub const fn defect_event(self) -> Event {
        match self {
            Light::Red => Event::RedLightDefect,
            Light::Yellow => Event::YellowLightDefect,
            Light::Green => Event::GreenLightDefect,
        }
    }

    /// Event emitted when this light recovers.
    pub const fn recovered_event(self) -> Event {
        match self {
            Light::Red => Event::RedLightRecovered,
            Light::Yellow => Event::YellowLightRecovered,
            Light::Green => Event::GreenLightRecovered,
        }
    }

    /// Whether this light is on in `pattern`.
    pub const fn is_on(self, pattern: &Pattern) -> bool {
        match self {
            Light::Red => pattern.red,
            Light::Yellow => pattern.yellow,
            Light::Green => pattern.green,
        }
    }
}

/// Traffic light controller.
///
/// # Type Parameters
///
/// - `P`: The I/O port ([`IoPort`] trait) driving lights and reading sense pins
/// - `C`: The time source ([`Clock`] trait)
///
/// # Thread Safety
///
/// The controller is single-threaded. All configuration, callback
/// registration and `update()` calls must come from the same context;
/// callbacks run inside `update()` and delay the next tick for as long as
/// they run.
pub struct TrafficLight<P: IoPort, C: Clock> {
    port: P,
    clock: C,
    light_pins: [PinId; 3],
    test_pins: [Option<PinId>; 3],
    intact: [bool; 3],
    pattern: Pattern,
    cycle: Cycle,
    activity: ActivityCycle,
    events: EventDispatcher,
    auto_lights_off: bool,
    auto_recovery: bool,
    defect: DefectConfig,
    last_scan_ms: Option<u32>,
}

impl<P: IoPort, C: Clock> TrafficLight<P, C> {
    /// Create a controller driving `light_pins` (red, yellow, green).
    ///
    /// Configures the three pins as outputs. Auto-lights-off starts enabled,
    /// auto-recovery disabled, no sense pins assigned.
    pub fn new(mut port: P, clock: C, light_pins: [PinId; 3]) -> Result<Self, P::Error> {
        for pin in light_pins {
            port.configure_output(pin)?;
        }

        Ok(Self {
            port,
            clock,
            light_pins,
            test_pins: [None; 3],
            intact: [true; 3],
            pattern: Pattern::OFF,
            cycle: Cycle::new(),
            activity: ActivityCycle::new(),
            events: EventDispatcher::new(),
            auto_lights_off: true,
            auto_recovery: false,
            defect: DefectConfig::default(),
            last_scan_ms: None,
        })
    }

    /// Create a controller and install `config` in one step.
    pub fn with_config(
        port: P,
        clock: C,
        light_pins: [PinId; 3],
        config: &TrafficLightConfig,
    ) -> Result<Self, P::Error> {
        let mut light = Self::new(port, clock, light_pins)?;
        light.apply_config(config)?;
        Ok(light)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Whether the phase cycle is running.
    pub fn is_cycle_enabled(&self) -> bool {
        self.cycle.is_enabled()
    }

    /// Whether the activity cycle is running.
    pub fn is_activity_cycle_enabled(&self) -> bool {
        self.activity.is_enabled()
    }

    /// Current activity state.
    pub fn activity_state(&self) -> ActivityState {
        self.activity.state()
    }

    /// Current light pattern.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// The phase cycle.
    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// The activity cycle.
    pub fn activity_cycle(&self) -> &ActivityCycle {
        &self.activity
    }

    /// Sense pin assigned to `light`, if any.
    pub fn test_pin(&self, light: Light) -> Option<PinId> {
        self.test_pins[light.index()]
    }

    /// Whether `light` is currently considered intact.
    pub fn is_light_intact(&self, light: Light) -> bool {
        self.intact[light.index()]
    }

    /// Whether auto-lights-off is enabled.
    pub fn auto_lights_off(&self) -> bool {
        self.auto_lights_off
    }

    /// Whether auto-recovery is enabled.
    pub fn auto_recovery(&self) -> bool {
        self.auto_recovery
    }

    /// Current defect detection settings.
    pub fn defect_config(&self) -> DefectConfig {
        self.defect
    }

    /// The I/O port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the I/O port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Get a state snapshot for UI/API.
    pub fn state(&self) -> TrafficLightState {
        TrafficLightState {
            pattern: self.pattern,
            cycle_enabled: self.cycle.is_enabled(),
            phase_index: self.cycle.current_phase().map(|_| self.cycle.phase_index()),
            repetitions_count: self.cycle.repetitions_count(),
            activity_enabled: self.activity.is_enabled(),
            activity_state: self.activity.state(),
            intact: self.intact,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Assign (or with `None`, remove) the sense pin for `light`.
    ///
    /// A newly assigned pin is configured as an input. Removing the pin also
    /// marks the light intact, since it can no longer be checked.
    pub fn set_test_pin(&mut self, light: Light, pin: Option<PinId>) -> Result<(), P::Error> {
        if let Some(pin) = pin {
            self.port.configure_input(pin)?;
        }
        self.assign_test_pin(light, pin);
        Ok(())
    }

    /// Same as [`set_test_pin`](Self::set_test_pin) addressed by index
    /// (0: red, 1: yellow, 2: green). Out-of-range indices are ignored.
    pub fn set_test_pin_index(&mut self, index: usize, pin: Option<PinId>) -> Result<(), P::Error> {
        match Light::from_index(index) {
            Some(light) => self.set_test_pin(light, pin),
            None => Ok(()),
        }
    }

    /// Assign sense pins for all three lights (red, yellow, green).
    ///
    /// All new pins are configured before any assignment changes, so a port
    /// error leaves the previous assignment in place.
    pub fn set_test_pins(&mut self, pins: [Option<PinId>; 3]) -> Result<(), P::Error> {
        for pin in pins.into_iter().flatten() {
            self.port.configure_input(pin)?;
        }
        for (light, pin) in Light::ALL.into_iter().zip(pins) {
            self.assign_test_pin(light, pin);
        }
        Ok(())
    }

    /// Set the light pattern directly.
    ///
    /// A running cycle overwrites it at its next phase change.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
    }

    /// Set how many full passes the cycle runs before stopping (0 = unlimited).
    pub fn set_cycle_repetitions_limit(&mut self, repetitions_limit: u32) {
        self.cycle.set_repetitions_limit(repetitions_limit);
    }

    /// Replace the phase table.
    ///
    /// If the cycle is running it restarts at the new phase 0 and shows its
    /// pattern immediately.
    pub fn set_cycle_phases(&mut self, phases: &[Phase]) {
        let now = self.clock.now_ms();
        self.cycle.set_phases(phases, now);
        if self.cycle.is_enabled() {
            self.adopt_current_phase();
        }
    }

    /// Set the active and inactive durations of the activity cycle.
    pub fn set_activity_cycle_times(&mut self, active_time_ms: u32, inactive_time_ms: u32) {
        self.activity.set_times(active_time_ms, inactive_time_ms);
    }

    /// Turn the lights off automatically when the activity cycle goes
    /// inactive, the cycle reaches its repetition limit, or the cycle is
    /// disabled.
    pub fn set_auto_lights_off(&mut self, enabled: bool) {
        self.auto_lights_off = enabled;
    }

    /// Let defective lights be marked intact again after a clean reading.
    pub fn set_auto_recovery(&mut self, enabled: bool) {
        self.auto_recovery = enabled;
    }

    /// Set the defect threshold and scan interval.
    pub fn set_defect_config(&mut self, defect: DefectConfig) {
        self.defect = defect;
    }

    /// Install a complete configuration.
    ///
    /// Replaces phases, repetition limit, activity times, sense pins, feature
    /// switches and defect settings. Neither state machine is enabled or
    /// disabled by this call.
    ///
    /// Sense pins are installed last. If configuring them fails, everything
    /// else is already applied and the previous sense pins stay assigned.
    pub fn apply_config(&mut self, config: &TrafficLightConfig) -> Result<(), P::Error> {
        self.set_cycle_phases(&config.phases);
        self.set_cycle_repetitions_limit(config.repetitions_limit);
        if let Some(activity) = config.activity {
            self.set_activity_cycle_times(activity.active_ms, activity.inactive_ms);
        }
        self.set_auto_lights_off(config.auto_lights_off);
        self.set_auto_recovery(config.auto_recovery);
        self.set_defect_config(config.defect);
        self.set_test_pins(config.test_pins)
    }

    // ------------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------------

    /// Start the phase cycle at phase 0 and show its pattern.
    pub fn enable_cycle(&mut self) {
        let now = self.clock.now_ms();
        self.cycle.enable(now);
        self.adopt_current_phase();
    }

    /// Stop the phase cycle.
    pub fn disable_cycle(&mut self) {
        self.cycle.disable();
        if self.auto_lights_off {
            self.pattern = Pattern::OFF;
        }
    }

    /// Start the activity cycle in the active state.
    pub fn enable_activity_cycle(&mut self) {
        let now = self.clock.now_ms();
        self.activity.enable(now);
    }

    /// Stop the activity cycle.
    pub fn disable_activity_cycle(&mut self) {
        self.activity.disable();
    }

    /// Mark `light` intact again without emitting an event.
    pub fn reset_defect(&mut self, light: Light) {
        self.intact[light.index()] = true;
    }

    /// Mark all lights intact again without emitting events.
    pub fn reset_defects(&mut self) {
        self.intact = [true; 3];
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Register the callback for `event`, replacing any previous one.
    pub fn register_event(&mut self, event: Event, callback: impl FnMut() + 'static) {
        self.events.connect(event, callback);
    }

    /// Remove the callback for `event`.
    pub fn unregister_event(&mut self, event: Event) {
        self.events.disconnect(event);
    }

    // ------------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------------

    /// Run one tick. Call this every loop iteration.
    pub fn update(&mut self) -> Result<(), P::Error> {
        let now = self.clock.now_ms();

        if self.activity.is_enabled() {
            self.activity.update(now);
            if self.activity.has_state_changed() {
                self.on_activity_state_changed();
            }
        }

        if self.cycle.is_enabled() && self.cycle.phase_count() > 0 {
            self.cycle.update(now);
            if self.cycle.has_phase_changed() {
                self.on_cycle_phase_changed();
            }
            if self.cycle.has_finished() {
                debug!("cycle finished pass {}", self.cycle.repetitions_count());
                self.events.emit(Event::CycleFinished);
            }
            if self.cycle.has_reached_repetitions_limit() {
                self.on_cycle_reached_repetitions_limit();
            }
        }

        self.write_lights()?;

        if self.test_pins.iter().any(Option::is_some) {
            let due = self
                .last_scan_ms
                .map_or(true, |last| elapsed_ms(now, last) >= self.defect.scan_interval_ms);
            if due {
                self.last_scan_ms = Some(now);
                self.scan_for_defects()?;
            }
        }

        Ok(())
    }

    fn assign_test_pin(&mut self, light: Light, pin: Option<PinId>) {
        self.test_pins[light.index()] = pin;
        if pin.is_none() {
            self.intact[light.index()] = true;
        }
    }

    fn adopt_current_phase(&mut self) {
        if let Some(phase) = self.cycle.current_phase() {
            self.pattern = phase.pattern;
        }
    }

    fn on_activity_state_changed(&mut self) {
        match self.activity.state() {
            ActivityState::Active => {
                info!("activity cycle active, starting cycle");
                self.enable_cycle();
                self.events.emit(Event::ActivityToActive);
            }
            ActivityState::Inactive => {
                info!("activity cycle inactive, pausing cycle");
                self.disable_cycle();
                self.events.emit(Event::ActivityToInactive);
            }
        }
        self.events.emit(Event::ActivityStateChanged);
    }

    fn on_cycle_phase_changed(&mut self) {
        self.adopt_current_phase();
        debug!(
            "phase {} of {}: {:?}",
            self.cycle.phase_index(),
            self.cycle.phase_count(),
            self.pattern
        );
        self.events.emit(Event::CyclePhaseChanged);
    }

    fn on_cycle_reached_repetitions_limit(&mut self) {
        info!(
            "cycle stopped after {} repetitions",
            self.cycle.repetitions_count()
        );
        if self.auto_lights_off {
            self.pattern = Pattern::OFF;
        }
        self.events.emit(Event::CycleReachedRepetitionsLimit);
    }

    fn write_lights(&mut self) -> Result<(), P::Error> {
        for light in Light::ALL {
            let level = Level::from(light.is_on(&self.pattern));
            self.port.write_digital(self.light_pins[light.index()], level)?;
        }
        Ok(())
    }

    fn scan_for_defects(&mut self) -> Result<(), P::Error> {
        for light in Light::ALL {
            let Some(pin) = self.test_pins[light.index()] else {
                continue;
            };
            if !light.is_on(&self.pattern) {
                continue;
            }

            let raw = self.port.read_analog(pin)?;
            let defective = raw > self.defect.threshold;
            trace!("sense {} pin {}: {}", light.as_str(), pin, raw);

            let intact = &mut self.intact[light.index()];
            if defective && *intact {
                *intact = false;
                warn!("{} light defective (sense {} > {})", light.as_str(), raw, self.defect.threshold);
                self.events.emit(light.defect_event());
            } else if !defective && !*intact && self.auto_recovery {
                *intact = true;
                info!("{} light recovered", light.as_str());
                self.events.emit(light.recovered_event());
            }
        }
        Ok(())
    }
}

/// Full state snapshot for UI/API.
///
/// # Example
///
/// ```rust
/// use traffic_light::{ActivityState, Pattern, TrafficLight};
/// use traffic_light::hal::{MockClock, MockPort};
///
/// let light = TrafficLight::new(MockPort::new(), MockClock::new(), [2, 3, 4]).unwrap();
///
/// let state = light.state();
/// assert_eq!(state.pattern, Pattern::OFF);
/// assert!(!state.cycle_enabled);
/// assert_eq!(state.activity_state, ActivityState::Active);
/// assert_eq!(state.intact, [true; 3]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficLightState {
    /// Lights currently commanded on.
    pub pattern: Pattern,
    /// Whether the phase cycle is running.
    pub cycle_enabled: bool,
    /// Current phase index, `None` without phases.
    pub phase_index: Option<usize>,
    /// Full passes since the cycle was last enabled.
    pub repetitions_count: u32,
    /// Whether the activity cycle is running.
    pub activity_enabled: bool,
    /// Current activity state.
    pub activity_state: ActivityState,
    /// Intact flag per light (red, yellow, green).
    pub intact: [bool; 3],
}

impl Default for TrafficLightState {
    fn default() -> Self {
        Self {
            pattern: Pattern::OFF,
            cycle_enabled: false,
            phase_index: None,
            repetitions_count: 0,
            activity_enabled: false,
            activity_state: ActivityState::Active,
            intact: [true; 3],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockPort};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    const PINS: [PinId; 3] = [10, 11, 12];

    fn light() -> TrafficLight<MockPort, MockClock> {
        TrafficLight::new(MockPort::new(), MockClock::new(), PINS).unwrap()
    }

    fn record_all(light: &mut TrafficLight<MockPort, MockClock>) -> Rc<RefCell<Vec<Event>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for event in Event::ALL {
            let log = log.clone();
            light.register_event(event, move || log.borrow_mut().push(event));
        }
        log
    }

    fn tick(light: &mut TrafficLight<MockPort, MockClock>, ms: u32) {
        light.clock_mut().advance(ms);
        light.update().unwrap();
    }

    // =========================================================================
    // Light Tests
    // =========================================================================

    #[test]
    fn light_index_roundtrip() {
        for light in Light::ALL {
            assert_eq!(Light::from_index(light.index()), Some(light));
        }
        assert_eq!(Light::from_index(3), None);
    }

    #[test]
    fn light_events() {
        assert_eq!(Light::Yellow.defect_event(), Event::YellowLightDefect);
        assert_eq!(Light::Green.recovered_event(), Event::GreenLightRecovered);
    }

    #[test]
    fn light_is_on() {
        assert!(Light::Red.is_on(&Pattern::RED_YELLOW));
        assert!(Light::Yellow.is_on(&Pattern::RED_YELLOW));
        assert!(!Light::Green.is_on(&Pattern::RED_YELLOW));
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn new_configures_outputs() {
        let light = light();
        assert_eq!(light.port().configured_outputs, PINS.to_vec());
        assert_eq!(light.pattern(), Pattern::OFF);
        assert!(light.auto_lights_off());
        assert!(!light.auto_recovery());
    }

    #[test]
    fn new_propagates_port_errors() {
        let port = MockPort::new().failing();
        assert!(TrafficLight::new(port, MockClock::new(), PINS).is_err());
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn update_writes_pattern() {
        let mut light = light();
        light.set_pattern(Pattern::RED_YELLOW);
        light.update().unwrap();

        assert!(light.port().is_high(10));
        assert!(light.port().is_high(11));
        assert!(!light.port().is_high(12));
        assert_eq!(light.port().level(12), Some(Level::Low));
    }

    #[test]
    fn update_propagates_write_errors() {
        let mut light = light();
        light.port_mut().fail = true;
        assert!(light.update().is_err());
    }

    // =========================================================================
    // Cycle Integration
    // =========================================================================

    #[test]
    fn enable_cycle_shows_first_phase() {
        let mut light = light();
        light.set_cycle_phases(&[Phase::new(100, Pattern::GREEN)]);
        assert_eq!(light.pattern(), Pattern::OFF);

        light.enable_cycle();
        assert_eq!(light.pattern(), Pattern::GREEN);
    }

    #[test]
    fn replacing_phases_while_running_shows_new_first_phase() {
        let mut light = light();
        light.set_cycle_phases(&[Phase::new(100, Pattern::GREEN)]);
        light.enable_cycle();

        light.set_cycle_phases(&[Phase::new(100, Pattern::YELLOW)]);
        assert_eq!(light.pattern(), Pattern::YELLOW);
    }

    #[test]
    fn disable_cycle_turns_lights_off() {
        let mut light = light();
        light.set_cycle_phases(&[Phase::new(100, Pattern::GREEN)]);
        light.enable_cycle();
        light.disable_cycle();
        assert_eq!(light.pattern(), Pattern::OFF);
    }

    #[test]
    fn disable_cycle_keeps_lights_without_auto_off() {
        let mut light = light();
        light.set_auto_lights_off(false);
        light.set_cycle_phases(&[Phase::new(100, Pattern::GREEN)]);
        light.enable_cycle();
        light.disable_cycle();
        assert_eq!(light.pattern(), Pattern::GREEN);
    }

    #[test]
    fn phase_change_emits_and_adopts() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_cycle_phases(&[
            Phase::new(100, Pattern::RED),
            Phase::new(100, Pattern::GREEN),
        ]);
        light.enable_cycle();

        tick(&mut light, 100);
        assert_eq!(light.pattern(), Pattern::GREEN);
        assert_eq!(*log.borrow(), [Event::CyclePhaseChanged]);

        tick(&mut light, 100);
        assert_eq!(light.pattern(), Pattern::RED);
        assert_eq!(
            *log.borrow(),
            [
                Event::CyclePhaseChanged,
                Event::CyclePhaseChanged,
                Event::CycleFinished
            ]
        );
    }

    #[test]
    fn repetition_limit_turns_lights_off() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_cycle_phases(&[Phase::new(100, Pattern::RED)]);
        light.set_cycle_repetitions_limit(1);
        light.enable_cycle();

        tick(&mut light, 100);
        assert!(!light.is_cycle_enabled());
        assert_eq!(light.pattern(), Pattern::OFF);
        assert_eq!(
            *log.borrow(),
            [
                Event::CyclePhaseChanged,
                Event::CycleFinished,
                Event::CycleReachedRepetitionsLimit
            ]
        );
    }

    #[test]
    fn repetition_limit_keeps_lights_without_auto_off() {
        let mut light = light();
        light.set_auto_lights_off(false);
        light.set_cycle_phases(&[Phase::new(100, Pattern::RED), Phase::new(100, Pattern::GREEN)]);
        light.set_cycle_repetitions_limit(1);
        light.enable_cycle();

        tick(&mut light, 100);
        tick(&mut light, 100);
        assert!(!light.is_cycle_enabled());
        // Wrapped back to the first phase before stopping
        assert_eq!(light.pattern(), Pattern::RED);
    }

    // =========================================================================
    // Activity Integration
    // =========================================================================

    #[test]
    fn activity_toggle_pauses_and_resumes_cycle() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_cycle_phases(&[Phase::new(10_000, Pattern::GREEN)]);
        light.set_activity_cycle_times(200, 300);
        light.enable_activity_cycle();
        light.enable_cycle();

        tick(&mut light, 200);
        assert_eq!(light.activity_state(), ActivityState::Inactive);
        assert!(!light.is_cycle_enabled());
        assert_eq!(light.pattern(), Pattern::OFF);
        assert_eq!(
            *log.borrow(),
            [Event::ActivityToInactive, Event::ActivityStateChanged]
        );

        log.borrow_mut().clear();
        tick(&mut light, 300);
        assert_eq!(light.activity_state(), ActivityState::Active);
        assert!(light.is_cycle_enabled());
        assert_eq!(light.pattern(), Pattern::GREEN);
        assert_eq!(
            *log.borrow(),
            [Event::ActivityToActive, Event::ActivityStateChanged]
        );
    }

    #[test]
    fn activity_inactive_keeps_lights_without_auto_off() {
        let mut light = light();
        light.set_auto_lights_off(false);
        light.set_cycle_phases(&[Phase::new(10_000, Pattern::GREEN)]);
        light.set_activity_cycle_times(200, 300);
        light.enable_activity_cycle();
        light.enable_cycle();

        tick(&mut light, 200);
        assert!(!light.is_cycle_enabled());
        assert_eq!(light.pattern(), Pattern::GREEN);
    }

    #[test]
    fn disabled_activity_cycle_does_not_touch_cycle() {
        let mut light = light();
        light.set_cycle_phases(&[Phase::new(10_000, Pattern::GREEN)]);
        light.set_activity_cycle_times(10, 10);
        light.enable_cycle();

        tick(&mut light, 100);
        assert!(light.is_cycle_enabled());
        assert!(!light.is_activity_cycle_enabled());
    }

    // =========================================================================
    // Defect Detection
    // =========================================================================

    #[test]
    fn set_test_pin_configures_input() {
        let mut light = light();
        light.set_test_pin(Light::Yellow, Some(33)).unwrap();
        assert_eq!(light.test_pin(Light::Yellow), Some(33));
        assert_eq!(light.port().configured_inputs, [33]);

        light.set_test_pin(Light::Yellow, None).unwrap();
        assert_eq!(light.test_pin(Light::Yellow), None);
    }

    #[test]
    fn removing_test_pin_clears_defect() {
        let mut light = light();
        light.set_auto_recovery(false);
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.set_pattern(Pattern::RED);
        light.port_mut().set_analog(30, 4000);
        light.update().unwrap();
        assert!(!light.is_light_intact(Light::Red));

        light.set_test_pin(Light::Red, None).unwrap();
        assert!(light.is_light_intact(Light::Red));
        tick(&mut light, 1000);
        assert_eq!(light.state().intact, [true; 3]);
    }

    #[test]
    fn set_test_pins_is_all_or_nothing() {
        let mut light = light();
        light.set_test_pins([Some(20), None, None]).unwrap();

        light.port_mut().fail = true;
        assert!(light.set_test_pins([Some(21), Some(22), Some(23)]).is_err());
        assert_eq!(light.test_pin(Light::Red), Some(20));
        assert_eq!(light.test_pin(Light::Yellow), None);
        assert_eq!(light.test_pin(Light::Green), None);
    }

    #[test]
    fn set_test_pin_index_ignores_out_of_range() {
        let mut light = light();
        light.set_test_pin_index(7, Some(33)).unwrap();
        assert!(light.port().configured_inputs.is_empty());

        light.set_test_pin_index(2, Some(34)).unwrap();
        assert_eq!(light.test_pin(Light::Green), Some(34));
    }

    #[test]
    fn defect_only_checked_while_light_on() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.port_mut().set_analog(30, 4000);

        light.update().unwrap();
        assert!(light.is_light_intact(Light::Red));
        assert_eq!(light.port().read_count, 0);

        light.set_pattern(Pattern::RED);
        tick(&mut light, 100);
        assert!(!light.is_light_intact(Light::Red));
        assert_eq!(*log.borrow(), [Event::RedLightDefect]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut light = light();
        light.set_test_pin(Light::Green, Some(31)).unwrap();
        light.set_pattern(Pattern::GREEN);

        light.port_mut().set_analog(31, 1000);
        light.update().unwrap();
        assert!(light.is_light_intact(Light::Green));

        light.port_mut().set_analog(31, 1001);
        tick(&mut light, 100);
        assert!(!light.is_light_intact(Light::Green));
    }

    #[test]
    fn scan_is_rate_limited() {
        let mut light = light();
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.set_pattern(Pattern::RED);

        light.update().unwrap();
        assert_eq!(light.port().read_count, 1);

        for _ in 0..9 {
            tick(&mut light, 10);
        }
        assert_eq!(light.port().read_count, 1);

        tick(&mut light, 10);
        assert_eq!(light.port().read_count, 2);
    }

    #[test]
    fn custom_defect_config() {
        let mut light = light();
        light.set_defect_config(DefectConfig {
            threshold: 200,
            scan_interval_ms: 50,
        });
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.set_pattern(Pattern::RED);
        light.port_mut().set_analog(30, 201);

        light.update().unwrap();
        assert!(!light.is_light_intact(Light::Red));

        tick(&mut light, 50);
        assert_eq!(light.port().read_count, 2);
    }

    #[test]
    fn recovery_with_auto_recovery() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_auto_recovery(true);
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.set_pattern(Pattern::RED);

        light.port_mut().set_analog(30, 2000);
        light.update().unwrap();
        light.port_mut().set_analog(30, 10);
        tick(&mut light, 100);

        assert!(light.is_light_intact(Light::Red));
        assert_eq!(*log.borrow(), [Event::RedLightDefect, Event::RedLightRecovered]);
    }

    #[test]
    fn reset_defect_allows_redetection() {
        let mut light = light();
        let log = record_all(&mut light);
        light.set_test_pin(Light::Red, Some(30)).unwrap();
        light.set_pattern(Pattern::RED);
        light.port_mut().set_analog(30, 2000);

        light.update().unwrap();
        light.reset_defect(Light::Red);
        assert!(light.is_light_intact(Light::Red));

        tick(&mut light, 100);
        assert_eq!(*log.borrow(), [Event::RedLightDefect, Event::RedLightDefect]);

        light.reset_defects();
        assert_eq!(light.state().intact, [true; 3]);
    }

    // =========================================================================
    // Config / State
    // =========================================================================

    #[test]
    fn apply_config_installs_everything() {
        let config = TrafficLightConfig::standard()
            .with_repetitions_limit(3)
            .with_activity(1000, 2000)
            .with_test_pins([Some(20), None, Some(22)])
            .with_auto_lights_off(false)
            .with_auto_recovery(true);

        let light =
            TrafficLight::with_config(MockPort::new(), MockClock::new(), PINS, &config).unwrap();

        assert_eq!(light.cycle().phase_count(), 4);
        assert_eq!(light.cycle().repetitions_limit(), 3);
        assert_eq!(light.activity_cycle().active_time_ms(), 1000);
        assert_eq!(light.activity_cycle().inactive_time_ms(), 2000);
        assert_eq!(light.test_pin(Light::Red), Some(20));
        assert_eq!(light.test_pin(Light::Yellow), None);
        assert!(!light.auto_lights_off());
        assert!(light.auto_recovery());
        assert!(!light.is_cycle_enabled());
        assert!(!light.is_activity_cycle_enabled());
    }

    #[test]
    fn apply_config_installs_sense_pins_last() {
        let mut light = light();
        light.port_mut().fail = true;
        let config = TrafficLightConfig::standard()
            .with_repetitions_limit(2)
            .with_auto_recovery(true)
            .with_test_pins([Some(20), None, None]);

        assert!(light.apply_config(&config).is_err());
        assert_eq!(light.cycle().phase_count(), 4);
        assert_eq!(light.cycle().repetitions_limit(), 2);
        assert!(light.auto_recovery());
        assert_eq!(light.test_pin(Light::Red), None);
    }

    #[test]
    fn state_snapshot_tracks_cycle() {
        let mut light = light();
        assert_eq!(light.state(), TrafficLightState::default());

        light.set_cycle_phases(&[Phase::new(100, Pattern::RED), Phase::new(100, Pattern::GREEN)]);
        light.enable_cycle();
        tick(&mut light, 100);

        let state = light.state();
        assert!(state.cycle_enabled);
        assert_eq!(state.phase_index, Some(1));
        assert_eq!(state.pattern, Pattern::GREEN);
    }
}
