//! Niche overlap metrics and character displacement.
//!
//! Cohabiting species that sit on top of each other in trait space get
//! pushed apart on the size and diet axes; the overall spread feeds the
//! sympatric speciation probability.

use ecogenesis_data::{trait_idx, BiomePopulation, OrganismTraits, TRAIT_COUNT, TRAIT_RANGES};

/// Normalized Euclidean distance in trait space, in [0, 1].
pub fn trait_distance(a: &OrganismTraits, b: &OrganismTraits) -> f64 {
    let mut sum = 0.0;
    for idx in 0..TRAIT_COUNT {
        let (min, max) = TRAIT_RANGES[idx];
        let width = max - min;
        let d = (a.get(idx) - b.get(idx)) / width;
        sum += d * d;
    }
    (sum / TRAIT_COUNT as f64).sqrt()
}

/// Mean pairwise trait distance across a biome's species, capped at 1.
/// A single-species biome scores zero diversity.
pub fn niche_diversity(biome: &BiomePopulation) -> f64 {
    let n = biome.species.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += trait_distance(&biome.species[i].traits, &biome.species[j].traits);
            pairs += 1;
        }
    }
    (total / pairs as f64 * 4.0).min(1.0)
}

/// Two species closer than this in trait space compete head-on.
pub const DISPLACEMENT_THRESHOLD: f64 = 0.08;
/// Nudge applied to each side of a crowded pair, per pass.
const DISPLACEMENT_NUDGE: f64 = 0.05;

/// Push trait-similar, well-established cohabitants apart on the size and
/// diet axes. Returns the number of displaced pairs.
pub fn apply_character_displacement(biome: &mut BiomePopulation) -> usize {
    let n = biome.species.len();
    let density_floor = (biome.carrying_capacity / 10.0) as u64;
    let mut displaced = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            if biome.species[i].head_count() < density_floor
                || biome.species[j].head_count() < density_floor
            {
                continue;
            }
            if trait_distance(&biome.species[i].traits, &biome.species[j].traits)
                >= DISPLACEMENT_THRESHOLD
            {
                continue;
            }
            let (first, second) = biome.species.split_at_mut(j);
            let a = &mut first[i].traits;
            let b = &mut second[0].traits;
            for idx in [
                trait_idx::SIZE,
                trait_idx::CARNIVORE_TENDENCY,
                trait_idx::HERBIVORE_TENDENCY,
            ] {
                let (min, max) = TRAIT_RANGES[idx];
                let nudge = DISPLACEMENT_NUDGE * (max - min);
                if a.get(idx) <= b.get(idx) {
                    a.nudge(idx, -nudge);
                    b.nudge(idx, nudge);
                } else {
                    a.nudge(idx, nudge);
                    b.nudge(idx, -nudge);
                }
            }
            displaced += 1;
        }
    }
    displaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecogenesis_data::{BiomeType, SpeciesPopulation};

    #[test]
    fn test_trait_distance_is_zero_on_self() {
        let traits = OrganismTraits::default();
        assert_eq!(trait_distance(&traits, &traits), 0.0);
    }

    #[test]
    fn test_identical_twins_get_displaced() {
        let mut biome = BiomePopulation::new(BiomeType::Grassland);
        biome.add_species(SpeciesPopulation::new(
            "TwinA",
            OrganismTraits::default(),
            2_000,
            0,
        ));
        biome.add_species(SpeciesPopulation::new(
            "TwinB",
            OrganismTraits::default(),
            2_000,
            0,
        ));
        let displaced = apply_character_displacement(&mut biome);
        assert_eq!(displaced, 1);
        assert!(
            trait_distance(&biome.species[0].traits, &biome.species[1].traits) > 0.0
        );
    }

    #[test]
    fn test_sparse_species_left_alone() {
        let mut biome = BiomePopulation::new(BiomeType::Grassland);
        biome.add_species(SpeciesPopulation::new(
            "RareA",
            OrganismTraits::default(),
            10,
            0,
        ));
        biome.add_species(SpeciesPopulation::new(
            "RareB",
            OrganismTraits::default(),
            10,
            0,
        ));
        assert_eq!(apply_character_displacement(&mut biome), 0);
    }

    #[test]
    fn test_diversity_grows_with_spread() {
        let mut uniform = BiomePopulation::new(BiomeType::Taiga);
        uniform.add_species(SpeciesPopulation::new("A", OrganismTraits::default(), 100, 0));
        uniform.add_species(SpeciesPopulation::new("B", OrganismTraits::default(), 100, 0));
        let mut spread = uniform.clone();
        spread.species[1].traits.set(trait_idx::SIZE, 9.0);
        spread.species[1].traits.set(trait_idx::CARNIVORE_TENDENCY, 9.0);
        assert!(niche_diversity(&spread) > niche_diversity(&uniform));
        assert_eq!(niche_diversity(&uniform), 0.0);
    }
}
