//! World bootstrap and per-year driving.
//!
//! `EcologyWorld` turns an interview-produced `WorldConfiguration` into a
//! running simulator: it parses the starting epoch, lays out the biome set
//! from the land/water ratio and climate bracket, seeds the founding
//! assemblages, and wires the geography layer. `update` ticks one year and
//! runs the caller-cadence subsystems (migration, isolation, tectonics).

use ecogenesis_core::cancel::CancelToken;
use ecogenesis_core::epochs::{GeologicalEpoch, MesozoicStage};
use ecogenesis_core::error::{EngineError, Result};
use ecogenesis_core::events::SimEvent;
use ecogenesis_core::geography::GeographyContext;
use ecogenesis_core::simulator::PopulationSimulator;
use ecogenesis_core::SimConfig;
use ecogenesis_data::{BiomeType, WorldConfiguration};
use uuid::Uuid;

/// Land biomes ordered cold to hot; the climate bracket selects a window.
const CLIMATE_LADDER: [BiomeType; 7] = [
    BiomeType::Tundra,
    BiomeType::Alpine,
    BiomeType::Taiga,
    BiomeType::DeciduousForest,
    BiomeType::Grassland,
    BiomeType::Rainforest,
    BiomeType::Desert,
];

/// One world: the simulator plus the configuration it was born from.
pub struct EcologyWorld {
    pub simulator: PopulationSimulator,
    pub configuration: WorldConfiguration,
    pub epoch: GeologicalEpoch,
    pub stage: MesozoicStage,
}

/// Outcome of a multi-year run.
pub struct RunOutcome {
    pub years_completed: u64,
    pub events: Vec<SimEvent>,
}

impl EcologyWorld {
    /// Bootstrap a world. The configuration is consumed read-only; a bad
    /// one is refused before any state exists.
    pub fn new(
        configuration: WorldConfiguration,
        world_id: Uuid,
        seed: u64,
    ) -> Result<Self> {
        configuration
            .validate()
            .map_err(|e| EngineError::configuration(e.to_string()))?;
        let (epoch, stage) =
            GeologicalEpoch::parse(&configuration.geological_age).ok_or_else(|| {
                EngineError::configuration(format!(
                    "unknown geological age '{}'",
                    configuration.geological_age
                ))
            })?;

        let mut config = SimConfig::load();
        config.disable_diseases = configuration.disable_diseases;
        config.magic_uplift = configuration.magic_level >= 5;

        let mut simulator = PopulationSimulator::new(world_id, seed, config);

        let biome_types = Self::biome_layout(&configuration);
        let mut land_ids = Vec::new();
        let mut ocean_ids = Vec::new();
        for biome_type in &biome_types {
            let id = simulator.add_biome(*biome_type);
            if biome_type.is_aquatic() {
                ocean_ids.push(id);
            } else {
                land_ids.push(id);
            }
        }

        if configuration.simulate_geology {
            let mut geography = GeographyContext::new(0.3);
            for pair in land_ids.windows(2) {
                geography.set_adjacent(pair[0], pair[1]);
            }
            for pair in ocean_ids.windows(2) {
                geography.set_adjacent(pair[0], pair[1]);
            }
            simulator.geography = Some(geography);
        }

        if configuration.simulate_life {
            for id in land_ids.iter().chain(ocean_ids.iter()) {
                simulator.seed_epoch(*id, epoch, stage)?;
            }
        }

        tracing::info!(
            world = %world_id,
            name = %configuration.name,
            epoch = ?epoch,
            biomes = biome_types.len(),
            species = simulator.total_species_count(),
            "world bootstrapped"
        );

        Ok(Self {
            simulator,
            configuration,
            epoch,
            stage,
        })
    }

    /// Biome set from planet size, land/water ratio, and climate bracket.
    fn biome_layout(configuration: &WorldConfiguration) -> Vec<BiomeType> {
        let total = configuration.biome_count();
        let ocean_count = (((1.0 - configuration.land_water_ratio) * total as f64).round()
            as usize)
            .clamp(1, total.saturating_sub(1).max(1));
        let land_count = total - ocean_count;

        let mut biomes = vec![BiomeType::Ocean; ocean_count];
        let ladder_len = CLIMATE_LADDER.len();
        for i in 0..land_count {
            // Sample the climate bracket evenly across the cold-to-hot ladder.
            let t = if land_count <= 1 {
                (configuration.climate_min + configuration.climate_max) / 2.0
            } else {
                configuration.climate_min
                    + (configuration.climate_max - configuration.climate_min)
                        * (i as f64 / (land_count - 1) as f64)
            };
            let idx = ((t * ladder_len as f64).floor() as usize).min(ladder_len - 1);
            biomes.push(CLIMATE_LADDER[idx]);
        }
        biomes
    }

    /// One simulated year plus the caller-cadence subsystems.
    pub fn update(&mut self) -> Vec<SimEvent> {
        if !self.configuration.simulate_life {
            return Vec::new();
        }
        self.simulator.tick();
        let year = self.simulator.current_year;
        let migration_interval = self.simulator.config.migration_interval;
        let isolation_interval = self.simulator.config.isolation_interval;
        let tectonic_interval = self.simulator.config.tectonic_interval;

        if self.configuration.simulate_geology {
            if year % migration_interval == 0 {
                self.simulator.apply_migration_step(year);
            }
            if year % isolation_interval == 0 {
                self.simulator.apply_isolation_step(isolation_interval, year);
            }
            if year % tectonic_interval == 0 {
                self.simulator.apply_tectonic_step();
            }
        }
        self.simulator.drain_events()
    }

    /// Run whole years, checking the token at each boundary. Cancellation
    /// leaves the last completed year fully applied and is not an error.
    pub fn simulate_years(&mut self, years: u64, cancel: &CancelToken) -> RunOutcome {
        let mut outcome = RunOutcome {
            years_completed: 0,
            events: Vec::new(),
        };
        for _ in 0..years {
            if cancel.is_cancelled() {
                break;
            }
            outcome.events.extend(self.update());
            outcome.years_completed += 1;
        }
        outcome
    }
}
