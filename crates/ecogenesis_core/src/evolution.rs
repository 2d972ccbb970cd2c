//! Generational trait drift and biome-specific selection pressure,
//! applied once per evolution window.

use ecogenesis_data::{trait_idx, BiomeType, Diet, SpeciesPopulation, TRAIT_COUNT};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Years covered by one evolution pass.
pub const EVOLUTION_WINDOW: f64 = 1_000.0;
/// Cap on effective generations per window, bounding drift sigma.
pub const MAX_GENERATIONS: f64 = 5_000.0;
/// Base drift coefficient.
pub const DRIFT_COEFF: f64 = 0.002;

/// Per-group drift amplitude weights, in trait units. Physical, survival,
/// and reproductive weights are load-bearing; the rest keep drift
/// proportionate to each group's range.
fn amplitude_weight(idx: usize) -> f64 {
    match idx {
        trait_idx::AUTOTROPHY..=trait_idx::MOTILITY => 0.02,
        trait_idx::SIZE..=trait_idx::STRENGTH => 0.5,
        trait_idx::INTELLIGENCE..=trait_idx::COMMUNICATION => 0.25,
        trait_idx::COLD_RESISTANCE..=trait_idx::NIGHT_VISION => 0.1,
        trait_idx::FERTILITY..=trait_idx::LIFESPAN => 0.05,
        trait_idx::CARNIVORE_TENDENCY..=trait_idx::DIGESTION_EFFICIENCY => 0.25,
        _ => 0.1,
    }
}

/// Effective generations elapsed in one window for this cohort.
pub fn effective_generations(species: &SpeciesPopulation) -> f64 {
    let per_year = species.traits.litter_size() / species.traits.maturity_age();
    (per_year * EVOLUTION_WINDOW).min(MAX_GENERATIONS)
}

/// One evolution pass: bump the generation counter, drift every trait by
/// variance-scaled Gaussian noise, then apply the biome's selection nudges.
/// Traits are re-clamped afterwards.
pub fn apply_evolution(
    species: &mut SpeciesPopulation,
    biome: BiomeType,
    rng: &mut impl Rng,
) {
    if species.is_extinct() {
        return;
    }
    let generations = effective_generations(species);
    species.generation += generations.round() as u64;

    let sigma_base = DRIFT_COEFF * species.variance * generations;
    if sigma_base > 0.0 {
        for idx in 0..TRAIT_COUNT {
            let sigma = sigma_base * amplitude_weight(idx);
            if sigma <= 0.0 {
                continue;
            }
            if let Ok(noise) = Normal::new(0.0, sigma) {
                species.traits.nudge(idx, noise.sample(rng));
            }
        }
    }

    apply_selection_pressure(species, biome);
    species.traits.clamp_all();

    // The genome tracks the cohort's slow molecular drift so that isolation
    // checks see real divergence.
    if let Some(genome) = species.genome.as_mut() {
        genome.mutate(0.02 * species.variance, 0.05, rng);
    }
}

/// Small directional nudges: what this biome rewards, per window.
fn apply_selection_pressure(species: &mut SpeciesPopulation, biome: BiomeType) {
    let traits = &mut species.traits;
    match biome {
        BiomeType::Tundra | BiomeType::Alpine => traits.nudge(trait_idx::COLD_RESISTANCE, 0.05),
        BiomeType::Desert => traits.nudge(trait_idx::HEAT_RESISTANCE, 0.05),
        BiomeType::Rainforest => traits.nudge(trait_idx::CAMOUFLAGE, 0.005),
        BiomeType::Grassland => traits.nudge(trait_idx::SPEED, 0.05),
        _ => {}
    }
    // Grazing specialists slowly entrench their diet.
    if species.diet == Diet::Herbivore {
        traits.nudge(trait_idx::HERBIVORE_TENDENCY, 0.01);
    }
}
