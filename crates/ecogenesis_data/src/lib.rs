//! Pure data structures for the Ecogenesis simulation.
//!
//! This crate contains serializable data types with no tick logic,
//! shared between the simulation engine and the persistence layer.

pub mod data;

pub use data::biome::*;
pub use data::config::*;
pub use data::genome::*;
pub use data::records::*;
pub use data::species::*;
pub use data::traits::*;
