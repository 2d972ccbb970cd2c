use crate::data::species::SpeciesPopulation;
use crate::data::traits::{Diet, OrganismTraits};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeType {
    Tundra,
    Alpine,
    Desert,
    Ocean,
    Rainforest,
    Grassland,
    Taiga,
    DeciduousForest,
}

impl BiomeType {
    pub const ALL: &'static [BiomeType] = &[
        BiomeType::Tundra,
        BiomeType::Alpine,
        BiomeType::Desert,
        BiomeType::Ocean,
        BiomeType::Rainforest,
        BiomeType::Grassland,
        BiomeType::Taiga,
        BiomeType::DeciduousForest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BiomeType::Tundra => "tundra",
            BiomeType::Alpine => "alpine",
            BiomeType::Desert => "desert",
            BiomeType::Ocean => "ocean",
            BiomeType::Rainforest => "rainforest",
            BiomeType::Grassland => "grassland",
            BiomeType::Taiga => "taiga",
            BiomeType::DeciduousForest => "deciduous forest",
        }
    }

    /// Soft ceiling on total head-count for a biome of this type.
    pub fn carrying_capacity(&self) -> f64 {
        match self {
            BiomeType::Ocean => 10_000.0,
            BiomeType::Rainforest => 8_000.0,
            BiomeType::DeciduousForest => 6_000.0,
            BiomeType::Grassland => 5_000.0,
            BiomeType::Taiga => 4_000.0,
            BiomeType::Alpine => 3_000.0,
            BiomeType::Tundra => 2_500.0,
            BiomeType::Desert => 2_000.0,
        }
    }

    pub fn is_aquatic(&self) -> bool {
        matches!(self, BiomeType::Ocean)
    }

    /// Fitness multiplier in [0.5, 1.5] relating a trait vector to this
    /// biome. Each arm rewards the adaptations that matter here.
    pub fn fitness(&self, traits: &OrganismTraits) -> f64 {
        let cold = traits.cold_resistance() / 10.0;
        let heat = traits.heat_resistance() / 10.0;
        let speed = traits.speed() / 10.0;
        let size = traits.size() / 10.0;
        let camo = traits.camouflage();
        let aquatic = traits.aquatic();
        let motility = traits.get(crate::data::traits::trait_idx::MOTILITY);
        let burrowing = traits.get(crate::data::traits::trait_idx::BURROWING);

        let base = match self {
            BiomeType::Tundra => 1.0 + 0.4 * cold - 0.2 * heat,
            BiomeType::Alpine => 1.0 + 0.3 * cold + 0.1 * (1.0 - size) - 0.1 * heat,
            BiomeType::Desert => 1.0 + 0.4 * heat - 0.2 * cold + 0.1 * burrowing,
            BiomeType::Ocean => 1.0 + 0.5 * aquatic - 0.2 * (1.0 - aquatic),
            BiomeType::Rainforest => 1.0 + 0.2 * heat + 0.3 * camo + 0.1 * motility,
            BiomeType::Grassland => {
                1.0 + 0.3 * speed + 0.1 * (traits.get(crate::data::traits::trait_idx::HERBIVORE_TENDENCY) / 10.0)
            }
            BiomeType::Taiga => 1.0 + 0.3 * cold + 0.1 * camo,
            BiomeType::DeciduousForest => {
                1.0 + 0.1 * camo
                    + 0.1 * motility
                    + 0.1 * traits.get(crate::data::traits::trait_idx::COMPLEXITY)
            }
        };
        base.clamp(0.5, 1.5)
    }
}

/// Head-counts by trophic class for one biome, captured once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DietCensus {
    pub flora: f64,
    pub herbivores: f64,
    pub predators: f64,
}

/// All species living in one biome, with its capacity and type tag.
/// Species are stored in a contiguous slice; id lookups only happen at the
/// biome boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomePopulation {
    pub id: Uuid,
    pub biome_type: BiomeType,
    pub species: Vec<SpeciesPopulation>,
    pub carrying_capacity: f64,
    pub years_simulated: u64,
    pub fragmentation: Option<f64>,
}

impl BiomePopulation {
    pub fn new(biome_type: BiomeType) -> Self {
        Self {
            id: Uuid::new_v4(),
            biome_type,
            species: Vec::new(),
            carrying_capacity: biome_type.carrying_capacity(),
            years_simulated: 0,
            fragmentation: None,
        }
    }

    pub fn species_by_id(&self, id: Uuid) -> Option<&SpeciesPopulation> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn species_by_id_mut(&mut self, id: Uuid) -> Option<&mut SpeciesPopulation> {
        self.species.iter_mut().find(|s| s.id == id)
    }

    pub fn total_head_count(&self) -> u64 {
        self.species.iter().map(|s| s.head_count()).sum()
    }

    pub fn census(&self) -> DietCensus {
        let mut census = DietCensus::default();
        for s in &self.species {
            let count = s.head_count() as f64;
            match s.diet {
                Diet::Photosynthetic => census.flora += count,
                Diet::Herbivore => census.herbivores += count,
                Diet::Carnivore | Diet::Omnivore => census.predators += count,
            }
        }
        census
    }

    pub fn add_species(&mut self, species: SpeciesPopulation) {
        self.species.push(species);
    }

    /// Pull every zero-head-count species out of the live map.
    pub fn drain_extinct(&mut self) -> Vec<SpeciesPopulation> {
        let mut extinct = Vec::new();
        self.species.retain(|s| {
            if s.is_extinct() {
                extinct.push(s.clone());
                false
            } else {
                true
            }
        });
        extinct
    }
}
