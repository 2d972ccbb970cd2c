//! Persistence for the Ecogenesis engine: world snapshots and the durable
//! event log. SQL-backed storage lives outside the engine; this crate only
//! speaks files and bytes.

pub mod error;
pub mod event_log;
pub mod snapshot;

pub use error::{IoError, Result};
pub use event_log::EventLog;
pub use snapshot::{checksum, load_snapshot, save_snapshot, snapshot_bytes};
