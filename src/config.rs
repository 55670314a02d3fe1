//! Controller configuration shared by desktop and ESP32 builds.
//!
//! The phase table is an owned `Vec`, so a configuration holds as many phases
//! as memory allows.
//!
//! # Example
//!
//! ```rust
//! use traffic_light::config::{DefectConfig, TrafficLightConfig};
//! use traffic_light::{Pattern, Phase};
//!
//! // Classic sequence
//! let config = TrafficLightConfig::standard();
//! assert_eq!(config.phases.len(), 4);
//!
//! // Or customize
//! let config = TrafficLightConfig::default()
//!     .with_phases(&[
//!         Phase::new(500, Pattern::YELLOW),
//!         Phase::new(500, Pattern::OFF),
//!     ])
//!     .with_activity(10_000, 5_000)
//!     .with_test_pins([None, Some(34), None])
//!     .with_defect(DefectConfig::default().with_threshold(800));
//! assert_eq!(config.defect.threshold, 800);
//! ```

use alloc::vec::Vec;

use crate::cycle::{Pattern, Phase};
use crate::traits::PinId;

// ============================================================================
// Main Config
// ============================================================================

/// Complete controller configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficLightConfig {
    /// Phase table, run in order
    pub phases: Vec<Phase>,
    /// Full passes before the cycle stops (0 = unlimited)
    pub repetitions_limit: u32,
    /// Activity cycle durations, `None` leaves the activity cycle untouched
    pub activity: Option<ActivityConfig>,
    /// Sense pin per light (red, yellow, green), `None` = not monitored
    pub test_pins: [Option<PinId>; 3],
    /// Lights off when paused, stopped or limited
    pub auto_lights_off: bool,
    /// Re-mark defective lights intact after a clean reading
    pub auto_recovery: bool,
    /// Defect detection settings
    pub defect: DefectConfig,
}

impl Default for TrafficLightConfig {
    fn default() -> Self {
        Self {
            phases: Vec::new(),
            repetitions_limit: 0,
            activity: None,
            test_pins: [None; 3],
            auto_lights_off: true,
            auto_recovery: false,
            defect: DefectConfig::default(),
        }
    }
}

impl TrafficLightConfig {
    /// Red, red+yellow, green, yellow.
    pub fn standard() -> Self {
        Self::default().with_phases(&[
            Phase::new(5000, Pattern::RED),
            Phase::new(1000, Pattern::RED_YELLOW),
            Phase::new(5000, Pattern::GREEN),
            Phase::new(2000, Pattern::YELLOW),
        ])
    }

    /// Replace the phase table
    pub fn with_phases(mut self, phases: &[Phase]) -> Self {
        self.phases = phases.to_vec();
        self
    }

    /// Append one phase
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    /// Set the repetition limit
    pub fn with_repetitions_limit(mut self, limit: u32) -> Self {
        self.repetitions_limit = limit;
        self
    }

    /// Set the activity cycle durations
    pub fn with_activity(mut self, active_ms: u32, inactive_ms: u32) -> Self {
        self.activity = Some(ActivityConfig {
            active_ms,
            inactive_ms,
        });
        self
    }

    /// Set the sense pins
    pub fn with_test_pins(mut self, pins: [Option<PinId>; 3]) -> Self {
        self.test_pins = pins;
        self
    }

    /// Set auto-lights-off
    pub fn with_auto_lights_off(mut self, enabled: bool) -> Self {
        self.auto_lights_off = enabled;
        self
    }

    /// Set auto-recovery
    pub fn with_auto_recovery(mut self, enabled: bool) -> Self {
        self.auto_recovery = enabled;
        self
    }

    /// Set defect detection settings
    pub fn with_defect(mut self, defect: DefectConfig) -> Self {
        self.defect = defect;
        self
    }

    /// Sum of all phase durations, i.e. the length of one pass
    pub fn pass_duration_ms(&self) -> u32 {
        self.phases
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.duration_ms))
    }

    /// Shortest configured duration, a hint for the polling interval
    pub fn shortest_duration_ms(&self) -> Option<u32> {
        let phases = self.phases.iter().map(|p| p.duration_ms);
        let activity = self
            .activity
            .into_iter()
            .flat_map(|a| [a.active_ms, a.inactive_ms]);
        phases.chain(activity).min()
    }
}

// ============================================================================
// Activity Config
// ============================================================================

/// Activity cycle durations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityConfig {
    /// Time the cycle runs, in milliseconds
    pub active_ms: u32,
    /// Time the cycle rests, in milliseconds
    pub inactive_ms: u32,
}

// ============================================================================
// Defect Config
// ============================================================================

/// Defect detection configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefectConfig {
    /// Raw sense readings above this mark the light defective
    pub threshold: u16,
    /// Minimum time between two scans, in milliseconds
    pub scan_interval_ms: u32,
}

impl Default for DefectConfig {
    fn default() -> Self {
        Self {
            threshold: 1000,
            scan_interval_ms: 100,
        }
    }
}

impl DefectConfig {
    /// Set the threshold
    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the scan interval
    pub fn with_scan_interval_ms(mut self, ms: u32) -> Self {
        self.scan_interval_ms = ms;
        self
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Parse a configuration from JSON bytes.
///
/// Missing fields take their defaults. Returns `None` for malformed input.
///
/// # Example
///
/// ```
/// use traffic_light::config::parse_config;
///
/// let json = br#"{
///     "phases": [
///         {"duration_ms": 500, "pattern": {"red": true, "yellow": false, "green": false}},
///         {"duration_ms": 500, "pattern": {"red": false, "yellow": false, "green": true}}
///     ],
///     "repetitions_limit": 3
/// }"#;
/// let config = parse_config(json).unwrap();
/// assert_eq!(config.phases.len(), 2);
/// assert_eq!(config.repetitions_limit, 3);
/// assert!(config.auto_lights_off);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_config(json: &[u8]) -> Option<TrafficLightConfig> {
    serde_json_core::from_slice(json).ok().map(|(config, _)| config)
}

// ============================================================================
// Tests
// ============================================================================
