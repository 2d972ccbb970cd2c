//! Diet-keyed trophic dynamics: the per-species, per-year head-count step.
//!
//! Coupled logistic / Lotka-Volterra style rules, switched on the closed
//! `Diet` sum type. All functions are pure; the simulator owns the noise,
//! the capacity rescale, and the extinction collection that follow.

use ecogenesis_data::{Diet, DietCensus, OrganismTraits};

/// Flora only ever claim this share of the biome's carrying capacity.
pub const FLORA_CAPACITY_SHARE: f64 = 0.4;
/// Flora logistic growth coefficient.
pub const FLORA_GROWTH_COEFF: f64 = 0.5;
/// Grazing pressure per herbivore head.
pub const GRAZING_COEFF: f64 = 0.001;
/// Seed-bank floor: flora never drop below this through grazing alone.
pub const SEED_BANK_MINIMUM: f64 = 10.0;
/// Herbivore birth coefficient.
pub const HERBIVORE_BIRTH_COEFF: f64 = 0.25;
/// Base yearly death coefficient, divided by lifespan.
pub const BASE_DEATH_COEFF: f64 = 0.05;
/// Predation pressure per predator head on herbivores.
pub const PREDATION_COEFF: f64 = 0.002;
/// Predator conversion efficiency baseline.
pub const PREDATOR_EFFICIENCY: f64 = 0.3;
/// Divisor turning flora into effective prey for omnivores.
pub const OMNIVORE_FLORA_SHARE: f64 = 5.0;
/// Prey heads needed to comfortably support one predator.
pub const PREY_PER_PREDATOR: f64 = 10.0;
/// Flora count above which herbivore food availability saturates.
pub const FLORA_ABUNDANCE: f64 = 100.0;

/// One year of logistic growth under grazing pressure.
pub fn flora_step(
    count: f64,
    traits: &OrganismTraits,
    fitness: f64,
    census: &DietCensus,
    biome_capacity: f64,
) -> f64 {
    let capacity = FLORA_CAPACITY_SHARE * biome_capacity;
    let growth_rate = FLORA_GROWTH_COEFF * traits.fertility() * fitness;
    let growth = growth_rate * count * (1.0 - count / capacity);
    let grazing_rate =
        (GRAZING_COEFF * census.herbivores * (1.0 - 0.3 * traits.camouflage())).max(0.0);
    let next = count + growth - grazing_rate * count;
    next.max(SEED_BANK_MINIMUM)
}

/// Food availability for a grazer: saturates at 1 over abundant flora and
/// never drops below 0.5 while flora are abundant.
fn food_availability(flora: f64, count: f64) -> f64 {
    let ratio = flora / (2.0 * count + 1.0);
    if flora > FLORA_ABUNDANCE {
        ratio.clamp(0.5, 1.0)
    } else {
        ratio.min(1.0)
    }
}

/// One year of herbivore births, deaths, and predation losses.
pub fn herbivore_step(
    count: f64,
    traits: &OrganismTraits,
    fitness: f64,
    census: &DietCensus,
) -> f64 {
    let food = food_availability(census.flora, count);
    let birth_rate = HERBIVORE_BIRTH_COEFF * traits.fertility() * fitness * food;
    let death_rate = (BASE_DEATH_COEFF / traits.lifespan()) * 10.0 / fitness;
    let escape = (1.0 - 0.04 * traits.speed() - 0.3 * traits.camouflage()).max(0.1);
    let predation_rate = PREDATION_COEFF * census.predators * escape;
    let next = count * (1.0 + birth_rate - death_rate - predation_rate);
    floor_fauna(count, next)
}

/// One year of predator dynamics. Omnivores supplement their prey pool
/// with a fraction of the standing flora.
pub fn predator_step(
    count: f64,
    traits: &OrganismTraits,
    fitness: f64,
    census: &DietCensus,
    omnivore: bool,
) -> f64 {
    let efficiency =
        PREDATOR_EFFICIENCY * (1.0 + 0.3 * traits.intelligence() / 10.0) * fitness;
    let mut prey = census.herbivores;
    if omnivore {
        prey += census.flora / OMNIVORE_FLORA_SHARE;
    }
    let prey_ratio = prey / (count * PREY_PER_PREDATOR).max(1.0);
    let hunt = 0.1 * (1.0 + 0.05 * traits.speed() + 0.05 * traits.strength());
    let birth_rate = efficiency * hunt * prey_ratio.min(2.0);
    let death_rate =
        (BASE_DEATH_COEFF / traits.lifespan()) * 10.0 / fitness / prey_ratio.clamp(0.25, 2.0);
    let next = count * (1.0 + birth_rate - death_rate);
    floor_fauna(count, next)
}

/// Fauna hold a floor of one head; a species already at the floor that
/// keeps losing ground is truly extinct.
fn floor_fauna(count: f64, next: f64) -> f64 {
    if next >= 1.0 {
        next
    } else if count <= 1.0 {
        0.0
    } else {
        1.0
    }
}

/// Dispatch the yearly step on the diet sum type.
pub fn next_head_count(
    diet: Diet,
    count: f64,
    traits: &OrganismTraits,
    fitness: f64,
    census: &DietCensus,
    biome_capacity: f64,
) -> f64 {
    match diet {
        Diet::Photosynthetic => flora_step(count, traits, fitness, census, biome_capacity),
        Diet::Herbivore => herbivore_step(count, traits, fitness, census),
        Diet::Carnivore => predator_step(count, traits, fitness, census, false),
        Diet::Omnivore => predator_step(count, traits, fitness, census, true),
    }
}
