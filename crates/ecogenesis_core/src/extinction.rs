//! Extinction-event impulses, the mass-extinction detector, and the
//! recovery-phase machinery (adaptive radiation, Lilliput selection).

use ecogenesis_data::{BiomeType, Diet, FossilRecord, SpeciesPopulation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtinctionEventKind {
    VolcanicWinter,
    AsteroidImpact,
    IceAge,
    OceanAnoxia,
    FloodBasalt,
    ContinentalDrift,
}

impl ExtinctionEventKind {
    /// Recorded as the extinction cause in the fossil record.
    pub fn cause_name(&self) -> &'static str {
        match self {
            ExtinctionEventKind::VolcanicWinter => "volcanic_winter",
            ExtinctionEventKind::AsteroidImpact => "asteroid_impact",
            ExtinctionEventKind::IceAge => "ice_age",
            ExtinctionEventKind::OceanAnoxia => "ocean_anoxia",
            ExtinctionEventKind::FloodBasalt => "flood_basalt",
            ExtinctionEventKind::ContinentalDrift => "continental_drift",
        }
    }
}

/// Mortality rate for one species under one event at the given severity.
/// Total on every input; never negative.
pub fn mortality_for(
    kind: ExtinctionEventKind,
    severity: f64,
    species: &SpeciesPopulation,
    biome: BiomeType,
) -> f64 {
    let severity = severity.clamp(0.0, 1.0);
    let traits = &species.traits;
    let cold = traits.cold_resistance() / 10.0;
    let poison = traits.poison_resistance() / 10.0;
    let intelligence = traits.intelligence() / 10.0;

    let rate = match kind {
        ExtinctionEventKind::VolcanicWinter => {
            let base = if species.diet == Diet::Photosynthetic {
                0.10
            } else {
                0.15
            };
            base * (1.0 - 0.5 * cold)
        }
        ExtinctionEventKind::AsteroidImpact => {
            let mut base = 0.7;
            if traits.size() < 2.0 {
                base *= 0.6;
            }
            base * (1.0 - 0.3 * intelligence)
        }
        ExtinctionEventKind::IceAge => {
            let base = if matches!(biome, BiomeType::Rainforest | BiomeType::Desert) {
                0.4
            } else {
                0.1
            };
            base * (1.0 - 0.8 * cold)
        }
        ExtinctionEventKind::OceanAnoxia => {
            if biome.is_aquatic() {
                0.5 + 0.02 * traits.size()
            } else {
                0.0
            }
        }
        ExtinctionEventKind::FloodBasalt => {
            if biome.is_aquatic() {
                0.0
            } else {
                0.25 * (1.0 - 0.5 * poison)
            }
        }
        ExtinctionEventKind::ContinentalDrift => 0.05,
    };
    (rate * severity).clamp(0.0, 1.0)
}

/// Counter-bounded regime after a mass-extinction trigger. While active,
/// the speciation checker runs with a radiation bonus and high mutation,
/// and the Lilliput effect reshapes body sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryState {
    pub active: bool,
    pub counter: u64,
}

impl RecoveryState {
    pub fn trigger(&mut self, years: u64) {
        self.active = true;
        self.counter = years;
    }

    /// One year of recovery. Returns true when the phase just ended.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.counter = self.counter.saturating_sub(1);
        if self.counter == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

/// Trailing-window detector: recovery begins when recent extinctions
/// dominate the biosphere.
pub fn check_for_mass_extinction(
    fossils: &FossilRecord,
    extant_species: usize,
    current_year: u64,
    window: u64,
    fraction: f64,
) -> bool {
    let since = current_year.saturating_sub(window);
    let recent = fossils.count_since(since);
    if recent == 0 {
        return false;
    }
    let share = recent as f64 / (recent + extant_species) as f64;
    share >= fraction
}

/// Lilliput effect: during recovery, small body plans gain ground and
/// large ones lose it, one yearly nudge at a time.
pub fn apply_recovery_effects(species: &mut SpeciesPopulation) {
    let factor = 1.0 + 0.01 * (5.0 - species.traits.size()) / 5.0;
    let next = (species.head_count() as f64 * factor).round() as u64;
    species.set_head_count(next);
}
