//! Shared builders for the integration suite.

#![allow(dead_code)]

use ecogenesis::{
    BiomeType, OrganismTraits, PopulationSimulator, SimConfig, SpeciesPopulation,
};
use ecogenesis_data::trait_idx;
use uuid::Uuid;

pub fn flora_traits() -> OrganismTraits {
    let mut traits = OrganismTraits::default();
    traits.set(trait_idx::AUTOTROPHY, 0.95);
    traits.set(trait_idx::MOTILITY, 0.0);
    traits.set(trait_idx::FERTILITY, 0.8);
    traits.set(trait_idx::PHOTOSYNTHESIS_EFFICIENCY, 0.8);
    traits
}

pub fn herbivore_traits() -> OrganismTraits {
    let mut traits = OrganismTraits::default();
    traits.set(trait_idx::AUTOTROPHY, 0.05);
    traits.set(trait_idx::HERBIVORE_TENDENCY, 8.5);
    traits.set(trait_idx::CARNIVORE_TENDENCY, 1.0);
    traits.set(trait_idx::FERTILITY, 0.6);
    traits
}

pub fn carnivore_traits() -> OrganismTraits {
    let mut traits = OrganismTraits::default();
    traits.set(trait_idx::AUTOTROPHY, 0.05);
    traits.set(trait_idx::CARNIVORE_TENDENCY, 8.5);
    traits.set(trait_idx::HERBIVORE_TENDENCY, 1.0);
    traits.set(trait_idx::SPEED, 6.0);
    traits.set(trait_idx::STRENGTH, 5.0);
    traits
}

/// Builder for a one-biome simulator with a hand-picked cast.
pub struct SimBuilder {
    seed: u64,
    biome_type: BiomeType,
    config: SimConfig,
    species: Vec<SpeciesPopulation>,
}

impl SimBuilder {
    pub fn new() -> Self {
        Self {
            seed: 42,
            biome_type: BiomeType::Grassland,
            config: SimConfig::default(),
            species: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_biome(mut self, biome_type: BiomeType) -> Self {
        self.biome_type = biome_type;
        self
    }

    pub fn with_config(mut self, f: impl FnOnce(&mut SimConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn with_species(
        mut self,
        name: &str,
        traits: OrganismTraits,
        head_count: u64,
    ) -> Self {
        self.species
            .push(SpeciesPopulation::new(name, traits, head_count, 0));
        self
    }

    /// Returns the simulator, the biome id, and the species ids in
    /// insertion order (as rewritten by the engine).
    pub fn build(self) -> (PopulationSimulator, Uuid, Vec<Uuid>) {
        let mut sim = PopulationSimulator::new(Uuid::new_v4(), self.seed, self.config);
        let biome = sim.add_biome(self.biome_type);
        let mut ids = Vec::new();
        for species in self.species {
            ids.push(sim.introduce_species(biome, species).unwrap());
        }
        (sim, biome, ids)
    }
}
