use crate::data::species::SpeciesPopulation;
use crate::data::traits::{Diet, OrganismTraits};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a species at the moment of extinction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtinctRecord {
    pub species_id: Uuid,
    pub name: String,
    pub traits: OrganismTraits,
    pub diet: Diet,
    pub peak_head_count: u64,
    pub year_from: u64,
    pub year_to: u64,
    pub cause: String,
    /// Biomes where fossils of this species can be found.
    pub fossil_biomes: Vec<Uuid>,
}

impl ExtinctRecord {
    pub fn from_species(
        species: &SpeciesPopulation,
        year: u64,
        cause: impl Into<String>,
        biome_id: Uuid,
    ) -> Self {
        Self {
            species_id: species.id,
            name: species.name.clone(),
            traits: species.traits.clone(),
            diet: species.diet,
            peak_head_count: species.peak_head_count,
            year_from: species.origin_year,
            year_to: year,
            cause: cause.into(),
            fossil_biomes: vec![biome_id],
        }
    }
}

/// Append-only log of every extinction in a world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FossilRecord {
    pub records: Vec<ExtinctRecord>,
}

impl FossilRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExtinctRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, species_id: Uuid) -> bool {
        self.records.iter().any(|r| r.species_id == species_id)
    }

    /// Extinctions recorded at or after `year`.
    pub fn count_since(&self, year: u64) -> usize {
        self.records.iter().filter(|r| r.year_to >= year).count()
    }

    pub fn by_cause(&self, cause: &str) -> Vec<&ExtinctRecord> {
        self.records.iter().filter(|r| r.cause == cause).collect()
    }
}
