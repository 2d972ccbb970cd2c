use serde::{Deserialize, Serialize};
use std::fs;

/// Engine tunables. Everything the tick loop treats as a constant but a
/// deployment may want to retune lives here; `Default` is the reference
/// parameterization.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    /// Years between evolution passes.
    pub evolution_interval: u64,
    /// Years between the simulator's own speciation sweep.
    pub speciation_interval: u64,
    /// Years between disease-outbreak rolls.
    pub disease_interval: u64,
    /// Years between migration sweeps (driven by the world driver).
    pub migration_interval: u64,
    /// Years between isolation/speciation-by-geography sweeps.
    pub isolation_interval: u64,
    /// Years between tectonic fragmentation updates.
    pub tectonic_interval: u64,
    /// Standard deviation of the per-year Gaussian head-count noise.
    pub noise_std: f64,
    /// Length of the post-mass-extinction recovery phase, in years.
    pub recovery_years: u64,
    /// Trailing window for the mass-extinction detector, in years.
    pub mass_extinction_window: u64,
    /// Recent-extinction share of (recent + extant) that trips the detector.
    pub mass_extinction_fraction: f64,
    /// Atmospheric-fraction change per flora head-count-year.
    /// Sensitive to world size; scale down for larger worlds.
    pub o2_flora_rate: f64,
    /// Atmospheric-fraction change per fauna head-count-year.
    /// Sensitive to world size; scale down for larger worlds.
    pub o2_fauna_rate: f64,
    /// Oxygen levels whose crossing emits an event.
    pub o2_thresholds: Vec<f64>,
    /// Starting atmospheric oxygen fraction.
    pub initial_oxygen: f64,
    /// Generations to walk a cascade before giving up.
    pub cascade_max_generations: usize,
    pub disable_diseases: bool,
    /// Relaxes the proto-sapience gates on high-magic worlds.
    pub magic_uplift: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            evolution_interval: 1_000,
            speciation_interval: 10_000,
            disease_interval: 500,
            migration_interval: 2_000,
            isolation_interval: 1_000,
            tectonic_interval: 50_000,
            noise_std: 0.05,
            recovery_years: 20_000,
            mass_extinction_window: 100,
            mass_extinction_fraction: 0.75,
            o2_flora_rate: 1e-8,
            o2_fauna_rate: 2e-8,
            o2_thresholds: vec![0.10, 0.15, 0.25, 0.30],
            initial_oxygen: 0.21,
            cascade_max_generations: 10,
            disable_diseases: false,
            magic_uplift: false,
        }
    }
}

impl SimConfig {
    /// Load from `ecogenesis.toml` when present, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(content) = fs::read_to_string("ecogenesis.toml") {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
            tracing::warn!("ecogenesis.toml exists but failed to parse, using defaults");
        }
        Self::default()
    }

    /// Unique hash of the dynamics constants. Snapshots taken under a
    /// different fingerprint are not resumable into this configuration.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self).as_bytes());
        hex::encode(hasher.finalize())
    }
}
