//! Ecogenesis: the macro-ecological simulation engine behind the Thousand
//! Worlds backend. Player-authored worlds are seeded from an interview
//! configuration, then evolved for up to tens of millions of deterministic
//! years: trophic dynamics, trait evolution, speciation, extinction
//! cascades, and a full phylogenetic record.
//!
//! The engine is embedded: no network surface, no CLI. Hosts construct an
//! [`EcologyWorld`], drive it with a [`SimulationRunner`], and consume the
//! event stream.

pub mod runner;
pub mod world;

pub use runner::SimulationRunner;
pub use world::{EcologyWorld, RunOutcome};

pub use ecogenesis_core::{
    CancelToken, CascadeSimulator, EcologicalRelationship, EcologicalRole, EngineError,
    ExtinctionEventKind, GeographyContext, GeologicalEpoch, MesozoicStage, PhylogeneticTree,
    PopulationSimulator, RelationshipKind, SimConfig, SimEvent, SpeciationChecker, SpeciationType,
};
pub use ecogenesis_data::{
    BiomePopulation, BiomeType, Diet, ExpressionMatrix, GeneticCode, OrganismTraits,
    SpeciesPopulation, WorldConfiguration,
};
pub use ecogenesis_io::{load_snapshot, save_snapshot, snapshot_bytes, EventLog};
