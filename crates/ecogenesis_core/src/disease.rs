//! Pathogen outbreaks. Dense cohorts are the ones that burn; genetic
//! diversity and poison resistance blunt the losses.

use crate::events::SimEvent;
use ecogenesis_data::BiomePopulation;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pathogen strain drawn from the world's RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathogen {
    pub id: Uuid,
    /// Mortality fraction at full density and virulence.
    pub lethality: f64,
    /// Chance the strain jumps to another cohort in the same biome.
    pub transmission: f64,
    pub duration_years: u64,
    pub virulence: f64,
}

impl Pathogen {
    pub fn from_rng(rng: &mut impl Rng) -> Self {
        Self {
            id: ecogenesis_data::uuid_from_rng(rng),
            lethality: rng.gen_range(0.05..0.5),
            transmission: rng.gen_range(0.05..0.4),
            duration_years: rng.gen_range(50..400),
            virulence: rng.gen_range(0.5..1.5),
        }
    }

    /// Drift of the strain itself between outbreaks.
    pub fn mutate(&mut self, rng: &mut impl Rng) {
        self.lethality = (self.lethality + rng.gen_range(-0.02..0.02)).clamp(0.01, 1.0);
        self.transmission = (self.transmission + rng.gen_range(-0.02..0.02)).clamp(0.01, 0.5);
    }
}

/// Mortality a strain inflicts on one cohort: scaled by crowding, blunted
/// by poison resistance and by the cohort's genetic diversity.
pub fn outbreak_mortality(
    pathogen: &Pathogen,
    head_count: u64,
    carrying_capacity: f64,
    poison_resistance: f64,
    variance: f64,
) -> f64 {
    let density = (head_count as f64 / carrying_capacity).min(1.0);
    let resistance = 1.0 - 0.5 * (poison_resistance / 10.0);
    let diversity_shield = 1.0 - 0.5 * variance;
    (pathogen.lethality * pathogen.virulence * density * resistance * diversity_shield)
        .clamp(0.0, 0.95)
}

/// Strike one biome: the densest cohort takes the primary hit, and the
/// strain may jump to others. Returns the events emitted.
pub fn run_outbreak(
    biome: &mut BiomePopulation,
    pathogen: &Pathogen,
    year: u64,
    rng: &mut impl Rng,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let Some(primary_idx) = biome
        .species
        .iter()
        .enumerate()
        .max_by_key(|(_, s)| s.head_count())
        .map(|(i, _)| i)
    else {
        return events;
    };
    if biome.species[primary_idx].head_count() == 0 {
        return events;
    }

    let carrying_capacity = biome.carrying_capacity;
    let biome_id = biome.id;
    let species_count = biome.species.len();
    for idx in 0..species_count {
        let is_primary = idx == primary_idx;
        if !is_primary && !rng.gen_bool(pathogen.transmission) {
            continue;
        }
        let species = &mut biome.species[idx];
        if species.head_count() == 0 {
            continue;
        }
        let mortality = outbreak_mortality(
            pathogen,
            species.head_count(),
            carrying_capacity,
            species.traits.poison_resistance(),
            species.variance,
        );
        if mortality <= 0.0 {
            continue;
        }
        species.apply_mortality(mortality);
        events.push(SimEvent::DiseaseOutbreak {
            year,
            biome_id,
            species_id: species.id,
            mortality,
        });
    }
    events
}
