use serde::{Deserialize, Serialize};

/// World parameters produced by the creation interview. Consumed read-only
/// at bootstrap to select the starting epoch, seed the biome set, and wire
/// simulation flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfiguration {
    pub name: String,
    pub theme: String,
    pub tech_level: u8,
    pub magic_level: u8,
    /// Starting geological age, e.g. "cenozoic" or "mesozoic:cretaceous".
    pub geological_age: String,
    /// "tiny" | "small" | "medium" | "large" | "vast"
    pub planet_size: String,
    /// Fraction of the surface that is land, in [0, 1].
    pub land_water_ratio: f64,
    /// Mean-climate bracket in [0, 1]: 0 = frozen, 1 = scorching.
    pub climate_min: f64,
    pub climate_max: f64,
    pub simulate_geology: bool,
    pub simulate_life: bool,
    pub disable_diseases: bool,
    pub sentient_species: Vec<String>,
}

impl Default for WorldConfiguration {
    fn default() -> Self {
        Self {
            name: "Unnamed World".to_string(),
            theme: "wilderness".to_string(),
            tech_level: 0,
            magic_level: 0,
            geological_age: "cenozoic".to_string(),
            planet_size: "medium".to_string(),
            land_water_ratio: 0.3,
            climate_min: 0.3,
            climate_max: 0.7,
            simulate_geology: true,
            simulate_life: true,
            disable_diseases: false,
            sentient_species: Vec::new(),
        }
    }
}

impl WorldConfiguration {
    /// Fail fast on configurations the engine refuses to start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("world name is empty");
        }
        if !(0.0..=1.0).contains(&self.land_water_ratio) {
            anyhow::bail!("land/water ratio {} outside [0, 1]", self.land_water_ratio);
        }
        if !(0.0..=1.0).contains(&self.climate_min)
            || !(0.0..=1.0).contains(&self.climate_max)
            || self.climate_min > self.climate_max
        {
            anyhow::bail!(
                "climate bracket [{}, {}] is not a sub-interval of [0, 1]",
                self.climate_min,
                self.climate_max
            );
        }
        if self.geological_age.trim().is_empty() {
            anyhow::bail!("geological age tag is missing");
        }
        Ok(())
    }

    /// Number of biomes this world starts with, from the planet-size tag.
    pub fn biome_count(&self) -> usize {
        match self.planet_size.as_str() {
            "tiny" => 3,
            "small" => 4,
            "medium" => 6,
            "large" => 8,
            "vast" => 10,
            _ => 6,
        }
    }
}
