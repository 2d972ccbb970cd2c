//! Symbiotic partnerships between cohabiting species.
//!
//! Pairings register mutualism edges in the cascade graph and earn a small
//! fitness bonus in the trophic step; obligate partners co-extinct.

use crate::cascade::{CascadeSimulator, EcologicalRelationship, RelationshipKind};
use ecogenesis_data::{BiomePopulation, Diet};
use rand::Rng;
use uuid::Uuid;

/// Fitness multiplier a bonded species enjoys.
pub const SYMBIOSIS_FITNESS_BONUS: f64 = 1.05;
/// Partnerships stronger than this are obligate.
pub const OBLIGATE_THRESHOLD: f64 = 0.6;

/// Whether two diets can plausibly trade services.
fn complementary(a: Diet, b: Diet) -> bool {
    matches!(
        (a, b),
        (Diet::Photosynthetic, Diet::Herbivore)
            | (Diet::Herbivore, Diet::Photosynthetic)
            | (Diet::Photosynthetic, Diet::Omnivore)
            | (Diet::Omnivore, Diet::Photosynthetic)
    )
}

/// Try to bond unpartnered, diet-complementary species pairs in one biome.
/// Each new bond adds mutualism edges both ways in the cascade graph.
pub fn form_partnerships(
    biome: &mut BiomePopulation,
    cascades: &mut CascadeSimulator,
    rng: &mut impl Rng,
) -> Vec<(Uuid, Uuid)> {
    let mut bonds = Vec::new();
    let count = biome.species.len();
    for i in 0..count {
        if biome.species[i].symbiont_id.is_some() || biome.species[i].is_extinct() {
            continue;
        }
        for j in (i + 1)..count {
            if biome.species[j].symbiont_id.is_some() || biome.species[j].is_extinct() {
                continue;
            }
            if !complementary(biome.species[i].diet, biome.species[j].diet) {
                continue;
            }
            let sociability = biome.species[i]
                .traits
                .social()
                .max(biome.species[j].traits.social());
            if sociability < 3.0 {
                continue;
            }
            if !rng.gen_bool(0.05 * sociability / 10.0) {
                continue;
            }

            let strength = rng.gen_range(0.3..0.8);
            let obligate = strength > OBLIGATE_THRESHOLD;
            let (a, b) = (biome.species[i].id, biome.species[j].id);
            biome.species[i].symbiont_id = Some(b);
            biome.species[j].symbiont_id = Some(a);
            cascades.add_relationship(EcologicalRelationship {
                source: a,
                target: b,
                kind: RelationshipKind::Mutualism,
                strength,
                obligate,
            });
            cascades.add_relationship(EcologicalRelationship {
                source: b,
                target: a,
                kind: RelationshipKind::Mutualism,
                strength,
                obligate,
            });
            bonds.push((a, b));
            break;
        }
    }
    bonds
}
