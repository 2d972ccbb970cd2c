//! Speciation decision machinery: allopatric, peripatric, and sympatric
//! entrypoints, each producing a daughter cohort when it fires.

use crate::naming;
use ecogenesis_data::{
    trait_idx, Diet, ExpressionMatrix, OrganismTraits, SpeciesPopulation, TRAIT_RANGES,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciationType {
    Root,
    Allopatric,
    Peripatric,
    Sympatric,
}

impl SpeciationType {
    pub fn name(&self) -> &'static str {
        match self {
            SpeciationType::Root => "root",
            SpeciationType::Allopatric => "allopatric",
            SpeciationType::Peripatric => "peripatric",
            SpeciationType::Sympatric => "sympatric",
        }
    }
}

/// One recorded split, drained by the simulator into the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciationRecord {
    pub year: u64,
    pub parent: Uuid,
    pub child: Uuid,
    pub speciation_type: SpeciationType,
    pub genetic_distance: f64,
    pub cause: String,
    pub region: Option<String>,
}

/// Decides when a species splits. Owns an event log and the recovery-phase
/// knobs (radiation bonus, high-mutation regime).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciationChecker {
    pub radiation_bonus: f64,
    pub high_mutation: bool,
    events: Vec<SpeciationRecord>,
}

impl Default for SpeciationChecker {
    fn default() -> Self {
        Self {
            radiation_bonus: 1.0,
            high_mutation: false,
            events: Vec::new(),
        }
    }
}

/// Inbreeding penalty on daughter variance: 1.0 from fifty founders,
/// falling linearly to 0.1 at two.
pub fn inbreeding_penalty(founders: u64) -> f64 {
    if founders >= 50 {
        1.0
    } else if founders <= 2 {
        0.1
    } else {
        0.1 + 0.9 * (founders as f64 - 2.0) / 48.0
    }
}

impl SpeciationChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split driven by long geographic separation. Requires an established
    /// population, at least fifty thousand years of isolation, and a genome
    /// to diverge.
    pub fn check_allopatric(
        &mut self,
        parent: &mut SpeciesPopulation,
        matrix: &ExpressionMatrix,
        isolation_years: u64,
        region: Option<&str>,
        year: u64,
        rng: &mut impl Rng,
    ) -> Option<SpeciesPopulation> {
        if parent.head_count() < 100 || isolation_years < 50_000 || parent.genome.is_none() {
            return None;
        }
        let probability =
            (isolation_years as f64 / 5_000_000.0).min(0.15) * self.radiation_bonus;
        if !rng.gen_bool(probability.min(1.0)) {
            return None;
        }

        let share = parent.head_count() / 4;
        let mutation_rate = if self.high_mutation { 0.2 } else { 0.1 };
        let mut genome = parent.genome.clone()?;
        genome.mutate(mutation_rate, 0.1, rng);
        let traits = OrganismTraits::from_phenotype(&matrix.express(&genome));
        let distance = parent
            .genome
            .as_ref()
            .map(|g| g.distance(&genome))
            .unwrap_or(0.0);

        let mut daughter = self.make_daughter(parent, traits, share, year, rng);
        daughter.genome = Some(genome);
        daughter.variance = parent.variance * 0.8;
        parent.variance *= 0.8;

        self.record(
            year,
            parent,
            &daughter,
            SpeciationType::Allopatric,
            distance,
            "geographic_isolation",
            region,
        );
        Some(daughter)
    }

    /// Split budding off a small peripheral isolate. Small founder pools
    /// pay an inbreeding penalty on variance.
    pub fn check_peripatric(
        &mut self,
        parent: &mut SpeciesPopulation,
        matrix: &ExpressionMatrix,
        peripheral: u64,
        isolation_years: u64,
        year: u64,
        rng: &mut impl Rng,
    ) -> Option<SpeciesPopulation> {
        if !(50..=500).contains(&peripheral) || isolation_years < 10_000 {
            return None;
        }
        let probability = (isolation_years as f64 / 1_000_000.0 * 500.0 / peripheral as f64)
            .min(0.2)
            * self.radiation_bonus;
        if !rng.gen_bool(probability.min(1.0)) {
            return None;
        }

        let share = parent.head_count() / 4;
        let mut distance = 0.0;
        let mut traits = parent.traits.clone();
        let genome = parent.genome.as_ref().map(|g| {
            let mut mutated = g.clone();
            mutated.mutate(0.15, 0.2, rng);
            distance = g.distance(&mutated);
            traits = OrganismTraits::from_phenotype(&matrix.express(&mutated));
            mutated
        });

        let mut daughter = self.make_daughter(parent, traits, share, year, rng);
        daughter.genome = genome;
        daughter.variance = parent.variance * 0.8 * inbreeding_penalty(peripheral);
        parent.variance *= 0.8;

        self.record(
            year,
            parent,
            &daughter,
            SpeciationType::Peripatric,
            distance,
            "peripheral_isolate",
            None,
        );
        Some(daughter)
    }

    /// Split within a shared range, driven by niche competition. The
    /// daughter's niche traits are pushed toward the extremes.
    pub fn check_sympatric(
        &mut self,
        parent: &mut SpeciesPopulation,
        competition: f64,
        niche_diversity: f64,
        year: u64,
        rng: &mut impl Rng,
    ) -> Option<SpeciesPopulation> {
        if parent.head_count() < 200 || parent.variance < 0.3 {
            return None;
        }
        let probability =
            0.05 * competition * niche_diversity * parent.variance * self.radiation_bonus;
        if !rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return None;
        }

        let share = parent.head_count() / 3;
        let mut traits = parent.traits.clone();
        extremize_niche_traits(&mut traits, rng);

        let mut distance = 0.0;
        let genome = parent.genome.as_ref().map(|g| {
            let mut mutated = g.clone();
            mutated.mutate(0.15, 0.15, rng);
            distance = g.distance(&mutated);
            mutated
        });

        let mut daughter = self.make_daughter(parent, traits, share, year, rng);
        daughter.genome = genome;
        daughter.variance = parent.variance * 0.8;
        parent.variance *= 0.8;

        self.record(
            year,
            parent,
            &daughter,
            SpeciationType::Sympatric,
            distance,
            "niche_divergence",
            None,
        );
        Some(daughter)
    }

    pub fn drain_events(&mut self) -> Vec<SpeciationRecord> {
        std::mem::take(&mut self.events)
    }

    fn make_daughter(
        &self,
        parent: &mut SpeciesPopulation,
        traits: OrganismTraits,
        share: u64,
        year: u64,
        rng: &mut impl Rng,
    ) -> SpeciesPopulation {
        parent.set_head_count(parent.head_count() - share);
        let diet = Diet::classify(&traits);
        let mut daughter =
            SpeciesPopulation::new(naming::species_name(diet, rng), traits, share, year);
        daughter.id = ecogenesis_data::uuid_from_rng(rng);
        daughter.ancestor_id = Some(parent.id);
        daughter.generation = parent.generation;
        daughter.covering = parent.covering;
        daughter.growth = parent.growth;
        daughter
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        year: u64,
        parent: &SpeciesPopulation,
        child: &SpeciesPopulation,
        speciation_type: SpeciationType,
        genetic_distance: f64,
        cause: &str,
        region: Option<&str>,
    ) {
        self.events.push(SpeciationRecord {
            year,
            parent: parent.id,
            child: child.id,
            speciation_type,
            genetic_distance,
            cause: cause.to_string(),
            region: region.map(str::to_string),
        });
    }
}

/// Push the niche-defining traits toward whichever extreme they already
/// lean to, by 15-30% of their range.
fn extremize_niche_traits(traits: &mut OrganismTraits, rng: &mut impl Rng) {
    const NICHE_TRAITS: [usize; 6] = [
        trait_idx::SIZE,
        trait_idx::SPEED,
        trait_idx::CARNIVORE_TENDENCY,
        trait_idx::NIGHT_VISION,
        trait_idx::COLD_RESISTANCE,
        trait_idx::HEAT_RESISTANCE,
    ];
    for idx in NICHE_TRAITS {
        let (min, max) = TRAIT_RANGES[idx];
        let mid = (min + max) / 2.0;
        let shift = rng.gen_range(0.15..0.30) * (max - min);
        let direction = if traits.get(idx) >= mid { 1.0 } else { -1.0 };
        traits.nudge(idx, direction * shift);
    }
}
