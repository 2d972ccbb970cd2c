//! Inter-biome migration and climate-driven biome transitions.

use crate::error::{EngineError, Result};
use crate::events::SimEvent;
use crate::extinction::ExtinctionEventKind;
use ecogenesis_data::{uuid_from_rng, BiomePopulation, BiomeType, SpeciesPopulation};
use rand::Rng;
use uuid::Uuid;

/// Chance that a species attempts migration this sweep: crowding pressure
/// times a diversity bonus, capped at one in two.
pub fn migration_chance(species: &SpeciesPopulation, biome: &BiomePopulation) -> f64 {
    let crowding = species.head_count() as f64 / biome.carrying_capacity;
    (crowding * 0.2 * (1.0 + species.variance)).min(0.5)
}

/// Move `floor(fraction * head_count)` individuals of a species between
/// two biomes. Ocean-land crossings are refused; arriving cohorts either
/// merge with a same-name, same-diet resident or found a new daughter
/// population with a 1.2x variance founder effect.
pub fn migrate_species(
    biomes: &mut [BiomePopulation],
    source_id: Uuid,
    dest_id: Uuid,
    species_id: Uuid,
    fraction: f64,
    year: u64,
    rng: &mut impl Rng,
) -> Result<u64> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(EngineError::invalid_argument(format!(
            "migration fraction {} outside [0, 1]",
            fraction
        )));
    }
    let source_idx = biomes
        .iter()
        .position(|b| b.id == source_id)
        .ok_or_else(|| EngineError::not_found(format!("source biome {}", source_id)))?;
    let dest_idx = biomes
        .iter()
        .position(|b| b.id == dest_id)
        .ok_or_else(|| EngineError::not_found(format!("destination biome {}", dest_id)))?;
    if source_idx == dest_idx {
        return Err(EngineError::invalid_argument(
            "source and destination biomes are the same",
        ));
    }
    if biomes[source_idx].biome_type.is_aquatic() != biomes[dest_idx].biome_type.is_aquatic() {
        return Err(EngineError::invalid_argument(
            "species cannot cross the ocean-land boundary",
        ));
    }

    let (source, dest) = if source_idx < dest_idx {
        let (left, right) = biomes.split_at_mut(dest_idx);
        (&mut left[source_idx], &mut right[0])
    } else {
        let (left, right) = biomes.split_at_mut(source_idx);
        (&mut right[0], &mut left[dest_idx])
    };

    let species = source.species_by_id_mut(species_id).ok_or_else(|| {
        EngineError::invalid_argument(format!("species {} not in source biome", species_id))
    })?;

    let moving = (fraction * species.head_count() as f64).floor() as u64;
    if moving == 0 {
        return Ok(0);
    }
    let remaining = species.head_count() - moving;
    species.set_head_count(remaining);
    let migrant_template = species.clone();

    let resident = dest
        .species
        .iter_mut()
        .find(|s| s.name == migrant_template.name && s.diet == migrant_template.diet);
    match resident {
        Some(resident) => {
            resident.set_head_count(resident.head_count() + moving);
        }
        None => {
            let mut founder = migrant_template;
            founder.id = uuid_from_rng(rng);
            founder.ancestor_id = Some(species_id);
            founder.origin_year = year;
            founder.set_head_count(moving);
            founder.peak_head_count = moving;
            founder.variance = (founder.variance * 1.2).min(1.0);
            founder.symbiont_id = None;
            dest.add_species(founder);
        }
    }
    Ok(moving)
}

/// Retag a biome and charge every resident the fitness gap, scaled by
/// severity.
pub fn transition_biome(
    biome: &mut BiomePopulation,
    new_type: BiomeType,
    severity: f64,
    year: u64,
) -> SimEvent {
    let severity = severity.clamp(0.0, 1.0);
    let old_type = biome.biome_type;
    for species in biome.species.iter_mut() {
        let old_fitness = old_type.fitness(&species.traits);
        let new_fitness = new_type.fitness(&species.traits);
        let mortality = ((old_fitness - new_fitness) * severity * 0.5).max(0.0);
        species.apply_mortality(mortality);
    }
    biome.biome_type = new_type;
    biome.carrying_capacity = new_type.carrying_capacity();
    SimEvent::BiomeTransition {
        year,
        biome_id: biome.id,
        from: old_type.name().to_string(),
        to: new_type.name().to_string(),
    }
}

/// Climate keyword an extinction event translates to, with per-kind
/// minimum severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateShift {
    Cooling,
    Warming,
    Drought,
}

pub fn climate_shift_for(kind: ExtinctionEventKind, severity: f64) -> Option<ClimateShift> {
    match kind {
        ExtinctionEventKind::IceAge if severity >= 0.3 => Some(ClimateShift::Cooling),
        ExtinctionEventKind::VolcanicWinter if severity >= 0.4 => Some(ClimateShift::Cooling),
        ExtinctionEventKind::AsteroidImpact if severity >= 0.6 => Some(ClimateShift::Cooling),
        ExtinctionEventKind::FloodBasalt if severity >= 0.4 => Some(ClimateShift::Warming),
        ExtinctionEventKind::ContinentalDrift if severity >= 0.5 => Some(ClimateShift::Drought),
        _ => None,
    }
}

/// Where a biome goes under a climate shift. Oceans never retag.
pub fn next_biome_type(current: BiomeType, shift: ClimateShift) -> Option<BiomeType> {
    use BiomeType::*;
    match shift {
        ClimateShift::Cooling => match current {
            Rainforest => Some(DeciduousForest),
            DeciduousForest => Some(Taiga),
            Taiga => Some(Tundra),
            Grassland => Some(Taiga),
            Desert => Some(Grassland),
            _ => None,
        },
        ClimateShift::Warming => match current {
            Tundra => Some(Taiga),
            Taiga => Some(DeciduousForest),
            DeciduousForest => Some(Rainforest),
            Alpine => Some(Grassland),
            _ => None,
        },
        ClimateShift::Drought => match current {
            Rainforest => Some(Grassland),
            DeciduousForest => Some(Grassland),
            Grassland => Some(Desert),
            Taiga => Some(Grassland),
            _ => None,
        },
    }
}

/// Apply an event's climate shift to every biome it moves.
pub fn apply_biome_transitions(
    biomes: &mut [BiomePopulation],
    kind: ExtinctionEventKind,
    severity: f64,
    year: u64,
) -> Vec<SimEvent> {
    let Some(shift) = climate_shift_for(kind, severity) else {
        return Vec::new();
    };
    let mut events = Vec::new();
    for biome in biomes.iter_mut() {
        if let Some(next) = next_biome_type(biome.biome_type, shift) {
            events.push(transition_biome(biome, next, severity, year));
        }
    }
    events
}
