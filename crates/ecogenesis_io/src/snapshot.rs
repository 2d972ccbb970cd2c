//! World snapshots: gzip-compressed JSON with a content checksum.
//!
//! A snapshot captures the whole simulator (biomes, fossil record,
//! phylogeny, cascade graph, oxygen, geography, RNG state, pending
//! events), so save → load → save round-trips byte-identically. All maps
//! in the simulator state are ordered, and serde_json's float encoding is
//! exact, which is what makes the identity hold.

use crate::error::{IoError, Result};
use ecogenesis_core::PopulationSimulator;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Serialize a simulator to its canonical snapshot bytes (uncompressed).
pub fn snapshot_bytes(simulator: &PopulationSimulator) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(simulator)?)
}

/// Content checksum of a snapshot.
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Write a compressed snapshot to disk.
pub fn save_snapshot<P: AsRef<Path>>(simulator: &PopulationSimulator, path: P) -> Result<()> {
    let bytes = snapshot_bytes(simulator)?;
    let file = File::create(&path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&bytes)?;
    encoder
        .finish()
        .map_err(|e| IoError::compression(e.to_string()))?;
    tracing::info!(
        world = %simulator.world_id,
        year = simulator.current_year,
        bytes = bytes.len(),
        "snapshot saved"
    );
    Ok(())
}

/// Read a compressed snapshot back.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<PopulationSimulator> {
    if !path.as_ref().exists() {
        return Err(IoError::not_found(path.as_ref().display().to_string()));
    }
    let file = File::open(&path)?;
    let mut decoder = GzDecoder::new(file);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::compression(e.to_string()))?;
    let simulator = serde_json::from_slice(&bytes)?;
    tracing::info!(path = %path.as_ref().display(), "snapshot loaded");
    Ok(simulator)
}

/// Verify that stored bytes still match an expected checksum.
pub fn verify(bytes: &[u8], expected: &str) -> Result<()> {
    let actual = checksum(bytes);
    if actual != expected {
        return Err(IoError::validation(format!(
            "checksum mismatch: expected {}, got {}",
            expected, actual
        )));
    }
    Ok(())
}
