//! Island-biogeography layer: biome adjacency consumed read-only from the
//! map generator, isolation-year accounting, and slow tectonic drift of
//! continental fragmentation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Fragmentation above which even connected biomes accumulate isolation.
pub const FRAGMENTATION_ISOLATION_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeographyContext {
    /// Which biomes touch which, as handed over by the map generator.
    pub adjacency: BTreeMap<Uuid, Vec<Uuid>>,
    /// Years each biome has spent cut off from gene flow.
    pub isolation_years: BTreeMap<Uuid, u64>,
    /// How broken up the landmass is, in [0, 1].
    pub continental_fragmentation: f64,
}

impl GeographyContext {
    pub fn new(fragmentation: f64) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            isolation_years: BTreeMap::new(),
            continental_fragmentation: fragmentation.clamp(0.0, 1.0),
        }
    }

    pub fn set_adjacent(&mut self, a: Uuid, b: Uuid) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    pub fn are_adjacent(&self, a: Uuid, b: Uuid) -> bool {
        self.adjacency
            .get(&a)
            .map(|list| list.contains(&b))
            .unwrap_or(false)
    }

    pub fn neighbors(&self, biome: Uuid) -> &[Uuid] {
        self.adjacency
            .get(&biome)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn isolation_of(&self, biome: Uuid) -> u64 {
        self.isolation_years.get(&biome).copied().unwrap_or(0)
    }

    /// Advance isolation clocks by `years`: biomes with no neighbors, and
    /// all biomes on a heavily fragmented world, drift apart; connected
    /// biomes on a whole continent re-mix and reset.
    pub fn accumulate_isolation(&mut self, biome_ids: &[Uuid], years: u64) {
        for &id in biome_ids {
            let cut_off = self.neighbors(id).is_empty()
                || self.continental_fragmentation > FRAGMENTATION_ISOLATION_THRESHOLD;
            let entry = self.isolation_years.entry(id).or_insert(0);
            if cut_off {
                *entry += years;
            } else {
                *entry = 0;
            }
        }
    }

    /// One tectonic step: fragmentation takes a small Gaussian walk.
    pub fn update_tectonics(&mut self, drift: f64, rng: &mut impl Rng) {
        if drift <= 0.0 {
            return;
        }
        if let Ok(noise) = Normal::new(0.0, drift) {
            self.continental_fragmentation =
                (self.continental_fragmentation + noise.sample(rng)).clamp(0.0, 1.0);
        }
    }

    /// A rifting impulse, e.g. from a continental-drift event.
    pub fn fragment(&mut self, amount: f64) {
        self.continental_fragmentation =
            (self.continental_fragmentation + amount).clamp(0.0, 1.0);
    }
}
