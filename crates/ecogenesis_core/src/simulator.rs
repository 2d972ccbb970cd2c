//! The population simulator: one instance drives one world.
//!
//! Tick order is part of the engine contract: trophic dynamics, noise,
//! capacity rescale, extinction collection, periodic subsystems, then
//! cascade propagation from whatever went extinct this year. All
//! randomness flows from the simulator's seeded RNG.

use crate::cancel::CancelToken;
use crate::cascade::{CascadeResult, CascadeSimulator};
use crate::config::SimConfig;
use crate::disease::{self, Pathogen};
use crate::dynamics;
use crate::environment::{self, OxygenTracker};
use crate::epochs::{self, GeologicalEpoch, MesozoicStage};
use crate::error::{EngineError, Result};
use crate::events::SimEvent;
use crate::evolution;
use crate::extinction::{self, ExtinctionEventKind, RecoveryState};
use crate::geography::GeographyContext;
use crate::migration;
use crate::naming;
use crate::niche;
use crate::phylogeny::PhylogeneticTree;
use crate::speciation::{SpeciationChecker, SpeciationType};
use crate::symbiosis;
use ecogenesis_data::{
    trait_idx, BiomePopulation, BiomeType, ExpressionMatrix, ExtinctRecord, FossilRecord,
    SpeciesPopulation, TRAIT_COUNT, TRAIT_RANGES,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSimulator {
    pub world_id: Uuid,
    pub current_year: u64,
    pub biomes: Vec<BiomePopulation>,
    pub fossils: FossilRecord,
    pub phylogeny: PhylogeneticTree,
    pub speciation: SpeciationChecker,
    pub cascades: CascadeSimulator,
    pub expression: ExpressionMatrix,
    pub config: SimConfig,
    pub recovery: RecoveryState,
    pub oxygen: OxygenTracker,
    pub geography: Option<GeographyContext>,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
    pathogens: Vec<Pathogen>,
}

impl PopulationSimulator {
    pub fn new(world_id: Uuid, seed: u64, config: SimConfig) -> Self {
        let oxygen = OxygenTracker::new(config.initial_oxygen, config.o2_thresholds.clone());
        Self {
            world_id,
            current_year: 0,
            biomes: Vec::new(),
            fossils: FossilRecord::new(),
            phylogeny: PhylogeneticTree::new(world_id),
            speciation: SpeciationChecker::new(),
            cascades: CascadeSimulator::new(),
            expression: ExpressionMatrix::default(),
            config,
            recovery: RecoveryState::default(),
            oxygen,
            geography: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
            pathogens: Vec::new(),
        }
    }

    pub fn add_biome(&mut self, biome_type: BiomeType) -> Uuid {
        let mut biome = BiomePopulation::new(biome_type);
        biome.id = ecogenesis_data::uuid_from_rng(&mut self.rng);
        let id = biome.id;
        self.biomes.push(biome);
        id
    }

    pub fn biome(&self, id: Uuid) -> Option<&BiomePopulation> {
        self.biomes.iter().find(|b| b.id == id)
    }

    pub fn biome_mut(&mut self, id: Uuid) -> Option<&mut BiomePopulation> {
        self.biomes.iter_mut().find(|b| b.id == id)
    }

    /// Register a species into a biome, the phylogeny, and the event
    /// stream. Species with a known ancestor link under it; everything
    /// else founds a root lineage.
    pub fn introduce_species(
        &mut self,
        biome_id: Uuid,
        mut species: SpeciesPopulation,
    ) -> Result<Uuid> {
        let idx = self
            .biomes
            .iter()
            .position(|b| b.id == biome_id)
            .ok_or_else(|| EngineError::not_found(format!("biome {}", biome_id)))?;
        species.id = ecogenesis_data::uuid_from_rng(&mut self.rng);
        let id = species.id;
        self.events.push(SimEvent::SpeciesCreated {
            species_id: id,
            name: species.name.clone(),
            diet: species.diet.name().to_string(),
            origin_year: species.origin_year,
            parent_id: species.ancestor_id,
            speciation_type: None,
        });
        match species.ancestor_id {
            Some(parent) if self.phylogeny.node(parent).is_some() => {
                self.phylogeny
                    .add_speciation(parent, &species, SpeciationType::Root);
            }
            _ => self.phylogeny.add_root(&species),
        }
        self.biomes[idx].add_species(species);
        Ok(id)
    }

    /// Materialize the age-appropriate founding assemblage in one biome.
    /// Returns how many species were seeded.
    pub fn seed_epoch(
        &mut self,
        biome_id: Uuid,
        epoch: GeologicalEpoch,
        stage: MesozoicStage,
    ) -> Result<usize> {
        let biome_type = self
            .biome(biome_id)
            .map(|b| b.biome_type)
            .ok_or_else(|| EngineError::not_found(format!("biome {}", biome_id)))?;
        let founders = epochs::seed_assemblage(epoch, stage, biome_type, &mut self.rng);
        let count = founders.len();
        for species in founders {
            self.introduce_species(biome_id, species)?;
        }
        Ok(count)
    }

    pub fn total_species_count(&self) -> usize {
        self.biomes.iter().map(|b| b.species.len()).sum()
    }

    /// Switch on a blank locus in one species' genome, e.g. as a scripted
    /// uplift impulse. Idempotent; refuses out-of-range loci.
    pub fn activate_blank_gene(&mut self, species_id: Uuid, locus: usize) -> Result<()> {
        for biome in &mut self.biomes {
            if let Some(species) = biome.species_by_id_mut(species_id) {
                let genome = species.genome.as_mut().ok_or_else(|| {
                    EngineError::invalid_argument(format!(
                        "species {} carries no genome",
                        species_id
                    ))
                })?;
                genome
                    .activate_blank(locus)
                    .map_err(|e| EngineError::invalid_argument(e.to_string()))?;
                let phenotype = self.expression.express(genome);
                species.traits = ecogenesis_data::OrganismTraits::from_phenotype(&phenotype);
                species.diet = ecogenesis_data::Diet::classify(&species.traits);
                return Ok(());
            }
        }
        Err(EngineError::not_found(format!("species {}", species_id)))
    }

    /// Species on the threshold of uplift, for the sentience subsystem to
    /// poll. High-magic worlds use the relaxed gates.
    pub fn proto_sapient_species(&self) -> Vec<Uuid> {
        self.biomes
            .iter()
            .flat_map(|b| &b.species)
            .filter(|s| s.traits.is_proto_sapient(self.config.magic_uplift))
            .map(|s| s.id)
            .collect()
    }

    pub fn total_head_count(&self) -> u64 {
        self.biomes.iter().map(|b| b.total_head_count()).sum()
    }

    /// Hand the pending event stream to a consumer.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// One simulated year.
    pub fn tick(&mut self) {
        self.current_year += 1;
        let year = self.current_year;
        let mut extinct_this_tick: Vec<Uuid> = Vec::new();

        // 1-4. Census, trophic step, noise.
        let noise = Normal::new(0.0, self.config.noise_std).ok();
        for biome in &mut self.biomes {
            biome.years_simulated += 1;
            let census = biome.census();
            let capacity = biome.carrying_capacity;
            let biome_type = biome.biome_type;
            for species in &mut biome.species {
                if species.is_extinct() {
                    continue;
                }
                species.promote_juveniles();
                let mut fitness = biome_type.fitness(&species.traits);
                if species.symbiont_id.is_some() {
                    fitness = (fitness * symbiosis::SYMBIOSIS_FITNESS_BONUS).min(1.5);
                }
                let mut next = dynamics::next_head_count(
                    species.diet,
                    species.head_count() as f64,
                    &species.traits,
                    fitness,
                    &census,
                    capacity,
                );
                if let Some(noise) = &noise {
                    next *= 1.0 + noise.sample(&mut self.rng);
                }
                species.set_head_count(next.max(0.0).round() as u64);
            }
            // 5. Capacity cap: rescale first, zero-clamp after.
            Self::rescale_to_capacity(biome);
        }

        // 6. Collect this year's collapses.
        extinct_this_tick.extend(self.collect_extinctions("population_collapse"));
        if !extinct_this_tick.is_empty() {
            self.check_for_mass_extinction();
        }

        // Periodic subsystems, in contract order.
        if self.recovery.active {
            self.apply_recovery_effects();
            if self.recovery.tick() {
                self.end_recovery();
            }
        }
        if year % self.config.evolution_interval == 0 {
            self.apply_evolution_pass();
        }
        if year % self.config.speciation_interval == 0 {
            self.apply_speciation_sweep(year);
        }
        if !self.config.disable_diseases && year % self.config.disease_interval == 0 {
            self.apply_disease_pass(year);
            extinct_this_tick.extend(self.collect_extinctions("disease"));
        }
        self.apply_oxygen_step(year);
        extinct_this_tick.extend(self.collect_extinctions("low_oxygen"));

        // 7. Cascade propagation from everything that died this year.
        self.propagate_cascades(&extinct_this_tick, year);
    }

    /// Run whole years until done or cancelled. Returns years completed;
    /// cancellation is not an error and the final year is never
    /// half-applied.
    pub fn simulate_years(&mut self, years: u64, cancel: &CancelToken) -> u64 {
        let mut completed = 0;
        for _ in 0..years {
            if cancel.is_cancelled() {
                break;
            }
            self.tick();
            completed += 1;
        }
        completed
    }

    /// Scale every species down proportionally when a biome runs over its
    /// carrying capacity. Nothing is scaled below one head.
    fn rescale_to_capacity(biome: &mut BiomePopulation) {
        let total = biome.total_head_count() as f64;
        if total <= biome.carrying_capacity {
            return;
        }
        let scale = biome.carrying_capacity / total;
        for species in &mut biome.species {
            let count = species.head_count();
            if count == 0 {
                continue;
            }
            let rescaled = ((count as f64 * scale).round() as u64).max(1);
            species.set_head_count(rescaled);
        }
    }

    /// Pull zero-head-count species out of every biome: fossil record,
    /// phylogeny, event stream, all in the same tick.
    fn collect_extinctions(&mut self, cause: &str) -> Vec<Uuid> {
        let year = self.current_year;
        let mut collected = Vec::new();
        for biome in &mut self.biomes {
            let biome_id = biome.id;
            for dead in biome.drain_extinct() {
                self.fossils
                    .push(ExtinctRecord::from_species(&dead, year, cause, biome_id));
                self.phylogeny.mark_extinct(dead.id, year);
                self.events.push(SimEvent::SpeciesExtinct {
                    species_id: dead.id,
                    year,
                    cause: cause.to_string(),
                });
                collected.push(dead.id);
            }
        }
        collected
    }

    /// Run the cascade walker for each trigger and apply the population
    /// multipliers. Secondary extinctions fall out of the multipliers and
    /// are collected here; the walker already visited them, so they do not
    /// re-trigger.
    fn propagate_cascades(&mut self, triggers: &[Uuid], year: u64) {
        for &trigger in triggers {
            let result =
                self.cascades
                    .calculate_cascade(trigger, year, self.config.cascade_max_generations);
            if result.affected_count > 0 {
                self.apply_cascade_result(&result, year);
            }
        }
        if !triggers.is_empty() {
            let _ = self.collect_extinctions("ecological_cascade");
        }
    }

    fn apply_cascade_result(&mut self, result: &CascadeResult, year: u64) {
        for (&species_id, &multiplier) in &result.multipliers {
            for biome in &mut self.biomes {
                if let Some(species) = biome.species_by_id_mut(species_id) {
                    let next = if multiplier <= 0.1 {
                        0
                    } else {
                        (species.head_count() as f64 * multiplier).round() as u64
                    };
                    species.set_head_count(next);
                    break;
                }
            }
        }
        for record in &result.events {
            self.events.push(SimEvent::Cascade {
                year,
                trigger: record.trigger,
                affected: record.affected,
                cascade_type: record.cascade_type.clone(),
                impact: record.impact,
                description: record.description.clone(),
            });
        }
    }

    /// Detector plus trigger: when recent extinctions dominate, enter the
    /// recovery phase (radiation bonus, high mutation) and say so.
    pub fn check_for_mass_extinction(&mut self) -> bool {
        if self.recovery.active {
            return true;
        }
        let extant = self.total_species_count();
        let tripped = extinction::check_for_mass_extinction(
            &self.fossils,
            extant,
            self.current_year,
            self.config.mass_extinction_window,
            self.config.mass_extinction_fraction,
        );
        if tripped {
            self.recovery.trigger(self.config.recovery_years);
            self.speciation.radiation_bonus = 2.0;
            self.speciation.high_mutation = true;
            self.events.push(SimEvent::MassExtinctionDetected {
                year: self.current_year,
                recovery_years: self.config.recovery_years,
            });
        }
        tripped
    }

    /// One year of Lilliput selection across every living species.
    pub fn apply_recovery_effects(&mut self) {
        for biome in &mut self.biomes {
            for species in &mut biome.species {
                extinction::apply_recovery_effects(species);
            }
        }
    }

    fn end_recovery(&mut self) {
        self.speciation.radiation_bonus = 1.0;
        self.speciation.high_mutation = false;
    }

    fn apply_evolution_pass(&mut self) {
        let hyperoxic = self.oxygen.is_hyperoxic();
        for biome in &mut self.biomes {
            let biome_type = biome.biome_type;
            for species in &mut biome.species {
                evolution::apply_evolution(species, biome_type, &mut self.rng);
                if hyperoxic {
                    // Thick air carries big bodies.
                    species.traits.nudge(trait_idx::SIZE, 0.05);
                }
            }
            niche::apply_character_displacement(biome);
            symbiosis::form_partnerships(biome, &mut self.cascades, &mut self.rng);
        }
    }

    /// The ten-thousand-year speciation sweep: the flat threshold split,
    /// plus a sympatric check driven by measured crowding and niche
    /// spread.
    fn apply_speciation_sweep(&mut self, year: u64) {
        for b_idx in 0..self.biomes.len() {
            let (competition, diversity) = {
                let biome = &self.biomes[b_idx];
                let competition =
                    (biome.total_head_count() as f64 / biome.carrying_capacity).min(1.0);
                (competition, niche::niche_diversity(biome))
            };

            let mut daughters: Vec<(Uuid, SpeciesPopulation, SpeciationType)> = Vec::new();
            {
                let biome = &mut self.biomes[b_idx];
                for species in &mut biome.species {
                    if species.head_count() > 500
                        && species.variance > 0.3
                        && self.rng.gen_bool(0.1)
                    {
                        let daughter = Self::split_species(species, year, &mut self.rng);
                        daughters.push((species.id, daughter, SpeciationType::Sympatric));
                    } else if let Some(daughter) = self.speciation.check_sympatric(
                        species,
                        competition,
                        diversity,
                        year,
                        &mut self.rng,
                    ) {
                        daughters.push((species.id, daughter, SpeciationType::Sympatric));
                    }
                }
            }
            for (parent, daughter, speciation_type) in daughters {
                self.register_daughter(b_idx, parent, daughter, speciation_type);
            }
        }
        self.drain_speciation_records();
    }

    /// The plain threshold split: a third of the cohort buds off with
    /// jittered traits; diversity drops on both sides.
    fn split_species(
        parent: &mut SpeciesPopulation,
        year: u64,
        rng: &mut impl Rng,
    ) -> SpeciesPopulation {
        let share = parent.head_count() / 3;
        parent.set_head_count(parent.head_count() - share);

        let mut traits = parent.traits.clone();
        for idx in 0..TRAIT_COUNT {
            if rng.gen_bool(0.15) {
                let (min, max) = TRAIT_RANGES[idx];
                if let Ok(jitter) = Normal::new(0.0, 0.05 * (max - min)) {
                    traits.nudge(idx, jitter.sample(rng));
                }
            }
        }

        let diet = ecogenesis_data::Diet::classify(&traits);
        let mut daughter =
            SpeciesPopulation::new(naming::species_name(diet, rng), traits, share, year);
        daughter.id = ecogenesis_data::uuid_from_rng(rng);
        daughter.ancestor_id = Some(parent.id);
        daughter.generation = parent.generation;
        daughter.covering = parent.covering;
        daughter.growth = parent.growth;
        daughter.variance = parent.variance * 0.8;
        daughter.genome = parent.genome.as_ref().map(|g| {
            let mut mutated = g.clone();
            mutated.mutate(0.15, 0.1, rng);
            mutated
        });
        parent.variance *= 0.8;
        daughter
    }

    fn register_daughter(
        &mut self,
        biome_idx: usize,
        parent_id: Uuid,
        daughter: SpeciesPopulation,
        speciation_type: SpeciationType,
    ) {
        self.events.push(SimEvent::SpeciesCreated {
            species_id: daughter.id,
            name: daughter.name.clone(),
            diet: daughter.diet.name().to_string(),
            origin_year: daughter.origin_year,
            parent_id: Some(parent_id),
            speciation_type: Some(speciation_type.name().to_string()),
        });
        self.phylogeny
            .add_speciation(parent_id, &daughter, speciation_type);
        self.biomes[biome_idx].add_species(daughter);
    }

    fn drain_speciation_records(&mut self) {
        for record in self.speciation.drain_events() {
            self.events.push(SimEvent::Speciation {
                year: record.year,
                parent: record.parent,
                child: record.child,
                speciation_type: record.speciation_type.name().to_string(),
                genetic_distance: record.genetic_distance,
                region: record.region,
            });
        }
    }

    fn apply_disease_pass(&mut self, year: u64) {
        if self.biomes.is_empty() {
            return;
        }
        if self.pathogens.is_empty() || self.rng.gen_bool(0.3) {
            let strain = Pathogen::from_rng(&mut self.rng);
            self.pathogens.push(strain);
        }
        if self.pathogens.len() > 3 {
            self.pathogens.remove(0);
        }
        let biome_idx = self.rng.gen_range(0..self.biomes.len());
        let strain_idx = self.rng.gen_range(0..self.pathogens.len());
        let mut strain = self.pathogens[strain_idx].clone();
        strain.mutate(&mut self.rng);
        self.pathogens[strain_idx] = strain.clone();
        let events =
            disease::run_outbreak(&mut self.biomes[biome_idx], &strain, year, &mut self.rng);
        self.events.extend(events);
    }

    fn apply_oxygen_step(&mut self, year: u64) {
        let mut flora = 0.0;
        let mut fauna = 0.0;
        for biome in &self.biomes {
            let census = biome.census();
            flora += census.flora;
            fauna += census.herbivores + census.predators;
        }
        if let Some((level, direction)) = self.oxygen.update(
            flora,
            fauna,
            self.config.o2_flora_rate,
            self.config.o2_fauna_rate,
        ) {
            self.events.push(SimEvent::OxygenThresholdCrossed {
                year,
                level,
                direction: direction.name().to_string(),
            });
        }
        if self.oxygen.is_hypoxic() {
            let level = self.oxygen.level;
            for biome in &mut self.biomes {
                for species in &mut biome.species {
                    let mortality = environment::hypoxia_mortality(level, &species.traits);
                    if mortality > 0.0 {
                        species.apply_mortality(mortality);
                    }
                }
            }
        }
    }

    /// Caller-driven environmental impulse: per-species mortality by event
    /// kind, climate-driven biome retagging, then extinction collection and
    /// cascades, all inside the current year. Refuses severities outside
    /// [0, 1].
    pub fn apply_extinction_event(
        &mut self,
        kind: ExtinctionEventKind,
        severity: f64,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&severity) {
            return Err(EngineError::invalid_argument(format!(
                "event severity {} outside [0, 1]",
                severity
            )));
        }
        let year = self.current_year;
        for biome in &mut self.biomes {
            let biome_type = biome.biome_type;
            for species in &mut biome.species {
                let rate = extinction::mortality_for(kind, severity, species, biome_type);
                if rate > 0.0 {
                    species.apply_mortality(rate);
                }
            }
        }

        let transitions = migration::apply_biome_transitions(&mut self.biomes, kind, severity, year);
        self.events.extend(transitions);

        if kind == ExtinctionEventKind::ContinentalDrift {
            if let Some(geography) = self.geography.as_mut() {
                geography.fragment(0.1 * severity);
            }
            self.speciation.radiation_bonus = (self.speciation.radiation_bonus * 1.2).min(3.0);
        }

        let extinct = self.collect_extinctions(kind.cause_name());
        if !extinct.is_empty() {
            self.check_for_mass_extinction();
        }
        self.propagate_cascades(&extinct, year);
        Ok(())
    }

    /// Caller-cadence migration sweep: crowded species spill into
    /// neighboring (or any same-shore) biomes.
    pub fn apply_migration_step(&mut self, year: u64) {
        let mut moves: Vec<(Uuid, Uuid, Uuid)> = Vec::new();
        for (b_idx, biome) in self.biomes.iter().enumerate() {
            for species in &biome.species {
                let chance = migration::migration_chance(species, biome);
                if chance <= 0.0 || !self.rng.gen_bool(chance) {
                    continue;
                }
                let candidates: Vec<Uuid> = match &self.geography {
                    Some(geography) => geography
                        .neighbors(biome.id)
                        .iter()
                        .copied()
                        .filter(|dest| {
                            self.biomes
                                .iter()
                                .any(|b| b.id == *dest && b.biome_type.is_aquatic() == biome.biome_type.is_aquatic())
                        })
                        .collect(),
                    None => self
                        .biomes
                        .iter()
                        .enumerate()
                        .filter(|(idx, b)| {
                            *idx != b_idx
                                && b.biome_type.is_aquatic() == biome.biome_type.is_aquatic()
                        })
                        .map(|(_, b)| b.id)
                        .collect(),
                };
                if candidates.is_empty() {
                    continue;
                }
                let dest = candidates[self.rng.gen_range(0..candidates.len())];
                moves.push((biome.id, dest, species.id));
            }
        }
        for (source, dest, species_id) in moves {
            let _ = migration::migrate_species(
                &mut self.biomes,
                source,
                dest,
                species_id,
                0.1,
                year,
                &mut self.rng,
            );
        }
    }

    /// Caller-cadence isolation sweep: isolated biomes accumulate years of
    /// separation and roll allopatric (and, on fragmented worlds,
    /// peripatric) speciation checks.
    pub fn apply_isolation_step(&mut self, years: u64, year: u64) {
        let biome_ids: Vec<Uuid> = self.biomes.iter().map(|b| b.id).collect();
        let fragmentation = {
            let Some(geography) = self.geography.as_mut() else {
                return;
            };
            geography.accumulate_isolation(&biome_ids, years);
            geography.continental_fragmentation
        };

        for b_idx in 0..self.biomes.len() {
            let (biome_id, biome_name) = {
                let biome = &self.biomes[b_idx];
                (biome.id, biome.biome_type.name())
            };
            let isolation = self
                .geography
                .as_ref()
                .map(|g| g.isolation_of(biome_id))
                .unwrap_or(0);
            if isolation == 0 {
                continue;
            }

            let mut daughters: Vec<(Uuid, SpeciesPopulation, SpeciationType)> = Vec::new();
            {
                let biome = &mut self.biomes[b_idx];
                for species in &mut biome.species {
                    if let Some(daughter) = self.speciation.check_allopatric(
                        species,
                        &self.expression,
                        isolation,
                        Some(biome_name),
                        year,
                        &mut self.rng,
                    ) {
                        daughters.push((species.id, daughter, SpeciationType::Allopatric));
                        continue;
                    }
                    if fragmentation > 0.5 {
                        let peripheral = species.head_count() / 20;
                        if let Some(daughter) = self.speciation.check_peripatric(
                            species,
                            &self.expression,
                            peripheral,
                            isolation,
                            year,
                            &mut self.rng,
                        ) {
                            daughters.push((species.id, daughter, SpeciationType::Peripatric));
                        }
                    }
                }
            }
            for (parent, daughter, speciation_type) in daughters {
                self.register_daughter(b_idx, parent, daughter, speciation_type);
            }
        }
        self.drain_speciation_records();
    }

    /// Caller-cadence tectonic step.
    pub fn apply_tectonic_step(&mut self) {
        if let Some(geography) = self.geography.as_mut() {
            geography.update_tectonics(0.02, &mut self.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecogenesis_data::OrganismTraits;

    fn seeded_sim() -> PopulationSimulator {
        let mut sim = PopulationSimulator::new(Uuid::new_v4(), 42, SimConfig::default());
        let biome = sim.add_biome(BiomeType::Grassland);
        let mut flora = OrganismTraits::default();
        flora.set(trait_idx::AUTOTROPHY, 0.9);
        flora.set(trait_idx::FERTILITY, 0.8);
        let mut grazer = OrganismTraits::default();
        grazer.set(trait_idx::AUTOTROPHY, 0.1);
        grazer.set(trait_idx::HERBIVORE_TENDENCY, 8.0);
        sim.introduce_species(biome, SpeciesPopulation::new("Grass", flora, 1_500, 0))
            .unwrap();
        sim.introduce_species(biome, SpeciesPopulation::new("Grazer", grazer, 200, 0))
            .unwrap();
        sim
    }

    #[test]
    fn test_tick_advances_year_and_keeps_invariants() {
        let mut sim = seeded_sim();
        for _ in 0..200 {
            sim.tick();
            for biome in &sim.biomes {
                let total = biome.total_head_count() as f64;
                assert!(total <= biome.carrying_capacity * 1.01);
                for species in &biome.species {
                    assert!(species.traits.in_bounds());
                }
            }
        }
        assert_eq!(sim.current_year, 200);
    }

    #[test]
    fn test_extinct_species_leave_the_live_map() {
        let mut sim = seeded_sim();
        sim.apply_extinction_event(ExtinctionEventKind::AsteroidImpact, 1.0).unwrap();
        // Whatever died is in the fossil record and out of every biome.
        for record in &sim.fossils.records {
            for biome in &sim.biomes {
                assert!(biome.species_by_id(record.species_id).is_none());
            }
        }
        let extant = sim.total_species_count();
        assert_eq!(
            sim.phylogeny.extant_count + sim.phylogeny.extinct_count,
            sim.phylogeny.len()
        );
        assert!(extant <= 2);
    }

    #[test]
    fn test_cancellation_stops_at_year_boundary() {
        let mut sim = seeded_sim();
        let token = CancelToken::new();
        token.cancel();
        let completed = sim.simulate_years(100, &token);
        assert_eq!(completed, 0);
        assert_eq!(sim.current_year, 0);

        let fresh = CancelToken::new();
        let completed = sim.simulate_years(10, &fresh);
        assert_eq!(completed, 10);
        assert_eq!(sim.current_year, 10);
    }

    #[test]
    fn test_events_drain_once() {
        let mut sim = seeded_sim();
        let first = sim.drain_events();
        assert_eq!(first.len(), 2); // the two introductions
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_blank_gene_activation_boundaries() {
        let mut sim = seeded_sim();
        let biome_id = sim.biomes[0].id;
        let mut bearer = SpeciesPopulation::new("Bearer", OrganismTraits::default(), 100, 0);
        bearer.genome = Some(ecogenesis_data::GeneticCode::default());
        let id = sim.introduce_species(biome_id, bearer).unwrap();

        assert!(sim.activate_blank_gene(id, 10).is_ok());
        assert!(sim.activate_blank_gene(id, 10).is_ok()); // idempotent
        assert!(matches!(
            sim.activate_blank_gene(id, 5_000),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            sim.activate_blank_gene(Uuid::new_v4(), 1),
            Err(EngineError::NotFound(_))
        ));
        // A species without a genome is refused too.
        let grass_id = sim.biomes[0].species[0].id;
        assert!(sim.activate_blank_gene(grass_id, 1).is_err());
    }

    #[test]
    fn test_proto_sapience_poll_honors_magic() {
        let mut sim = seeded_sim();
        let biome_id = sim.biomes[0].id;
        let mut clever = OrganismTraits::default();
        clever.set(trait_idx::AUTOTROPHY, 0.1);
        clever.set(trait_idx::INTELLIGENCE, 6.0);
        clever.set(trait_idx::COMMUNICATION, 4.0);
        let id = sim
            .introduce_species(
                biome_id,
                SpeciesPopulation::new("Thinker", clever, 300, 0),
            )
            .unwrap();

        assert!(sim.proto_sapient_species().is_empty());
        sim.config.magic_uplift = true;
        assert_eq!(sim.proto_sapient_species(), vec![id]);
    }

    #[test]
    fn test_continental_drift_primes_radiation() {
        let mut sim = seeded_sim();
        sim.geography = Some(GeographyContext::new(0.2));
        let bonus_before = sim.speciation.radiation_bonus;
        sim.apply_extinction_event(ExtinctionEventKind::ContinentalDrift, 1.0).unwrap();
        assert!(sim.speciation.radiation_bonus > bonus_before);
        assert!(
            sim.geography.as_ref().unwrap().continental_fragmentation > 0.2
        );
    }
}
