use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the engine tells the outside world. Consumers (persistence,
/// live broadcast) drain these from the simulator; the engine never calls
/// into them.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event")]
pub enum SimEvent {
    SpeciesCreated {
        species_id: Uuid,
        name: String,
        diet: String,
        origin_year: u64,
        parent_id: Option<Uuid>,
        speciation_type: Option<String>,
    },
    SpeciesExtinct {
        species_id: Uuid,
        year: u64,
        cause: String,
    },
    Speciation {
        year: u64,
        parent: Uuid,
        child: Uuid,
        speciation_type: String,
        genetic_distance: f64,
        region: Option<String>,
    },
    Cascade {
        year: u64,
        trigger: Uuid,
        affected: Uuid,
        cascade_type: String,
        impact: f64,
        description: String,
    },
    MassExtinctionDetected {
        year: u64,
        recovery_years: u64,
    },
    OxygenThresholdCrossed {
        year: u64,
        level: f64,
        direction: String,
    },
    DiseaseOutbreak {
        year: u64,
        biome_id: Uuid,
        species_id: Uuid,
        mortality: f64,
    },
    BiomeTransition {
        year: u64,
        biome_id: Uuid,
        from: String,
        to: String,
    },
}
