//! Atmospheric oxygen accounting.
//!
//! Flora exhale, fauna inhale; the balance drifts over geological time and
//! crossing a threshold changes what body plans the world can support.

use ecogenesis_data::OrganismTraits;
use serde::{Deserialize, Serialize};

/// Oxygen below this level starts suffocating large fauna.
pub const HYPOXIA_LEVEL: f64 = 0.15;
/// Oxygen above this level opens the giant-arthropod regime.
pub const HYPEROXIA_LEVEL: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OxygenDirection {
    Rising,
    Falling,
}

impl OxygenDirection {
    pub fn name(&self) -> &'static str {
        match self {
            OxygenDirection::Rising => "rising",
            OxygenDirection::Falling => "falling",
        }
    }
}

/// Tracks the atmospheric oxygen fraction and reports threshold crossings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OxygenTracker {
    pub level: f64,
    pub thresholds: Vec<f64>,
}

impl OxygenTracker {
    pub fn new(initial: f64, thresholds: Vec<f64>) -> Self {
        Self {
            level: initial.clamp(0.0, 1.0),
            thresholds,
        }
    }

    /// One year of atmosphere chemistry. The rates carry units of
    /// atmospheric fraction per head-count-year. Returns the first
    /// threshold crossed, if any.
    pub fn update(
        &mut self,
        flora_units: f64,
        fauna_units: f64,
        flora_rate: f64,
        fauna_rate: f64,
    ) -> Option<(f64, OxygenDirection)> {
        let previous = self.level;
        let delta = flora_units * flora_rate - fauna_units * fauna_rate;
        self.level = (previous + delta).clamp(0.0, 1.0);

        for &threshold in &self.thresholds {
            if previous < threshold && self.level >= threshold {
                return Some((threshold, OxygenDirection::Rising));
            }
            if previous > threshold && self.level <= threshold {
                return Some((threshold, OxygenDirection::Falling));
            }
        }
        None
    }

    pub fn is_hypoxic(&self) -> bool {
        self.level < HYPOXIA_LEVEL
    }

    pub fn is_hyperoxic(&self) -> bool {
        self.level > HYPEROXIA_LEVEL
    }
}

/// Extra yearly mortality large fauna pay in thin air. Zero for flora and
/// for any air that is not hypoxic.
pub fn hypoxia_mortality(level: f64, traits: &OrganismTraits) -> f64 {
    if level >= HYPOXIA_LEVEL || traits.is_autotroph() {
        return 0.0;
    }
    let deficit = (HYPOXIA_LEVEL - level) / HYPOXIA_LEVEL;
    (0.02 * (traits.size() / 10.0) * deficit).clamp(0.0, 0.5)
}
