//! The macro-ecological simulation engine: population dynamics, evolution,
//! speciation, extinction cascades, and the phylogenetic record, all driven
//! by one deterministic tick loop per world.

pub mod cancel;
pub mod cascade;
pub mod config;
pub mod disease;
pub mod dynamics;
pub mod environment;
pub mod epochs;
pub mod error;
pub mod events;
pub mod evolution;
pub mod extinction;
pub mod geography;
pub mod migration;
pub mod naming;
pub mod niche;
pub mod phylogeny;
pub mod simulator;
pub mod speciation;
pub mod symbiosis;

pub use cancel::CancelToken;
pub use cascade::{
    CascadeEventRecord, CascadeResult, CascadeSimulator, EcologicalRelationship, EcologicalRole,
    RelationshipKind,
};
pub use config::SimConfig;
pub use disease::Pathogen;
pub use environment::{OxygenDirection, OxygenTracker};
pub use epochs::{GeologicalEpoch, MesozoicStage};
pub use error::{EngineError, Result};
pub use events::SimEvent;
pub use extinction::{ExtinctionEventKind, RecoveryState};
pub use geography::GeographyContext;
pub use phylogeny::{PhyloNode, PhylogeneticTree};
pub use simulator::PopulationSimulator;
pub use speciation::{SpeciationChecker, SpeciationRecord, SpeciationType};
