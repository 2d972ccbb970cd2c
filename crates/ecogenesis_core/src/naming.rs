//! Species naming and descriptive output for the player-facing stream.

use ecogenesis_data::{BiomeType, Diet, SpeciesPopulation};
use rand::Rng;

const GENUS_PREFIXES: &[&str] = &[
    "Ar", "Bra", "Ce", "Den", "Eo", "Fla", "Gor", "Hy", "Ixo", "Ka", "Lo", "Mi", "Neo", "Or",
    "Pa", "Qua", "Rho", "Sar", "Tri", "Ul", "Ve", "Xan", "Zy",
];

const GENUS_MIDDLES: &[&str] = &[
    "can", "dor", "lax", "mor", "nat", "pho", "rex", "sil", "tan", "vor", "lum", "gar",
];

/// Genus endings flavored by trophic role.
fn genus_suffixes(diet: Diet) -> &'static [&'static str] {
    match diet {
        Diet::Photosynthetic => &["ophyta", "ophyll", "ifolia", "othallus", "osperma"],
        Diet::Herbivore => &["odon", "otherium", "ograzus", "olophus", "oceras"],
        Diet::Carnivore => &["osaurus", "oraptor", "ognathus", "ovenator", "odactyl"],
        Diet::Omnivore => &["omys", "opithecus", "ovorax", "oscandens", "oportis"],
    }
}

const EPITHETS: &[&str] = &[
    "minor", "major", "borealis", "australis", "vulgaris", "elegans", "robustus", "gracilis",
    "ferox", "placidus", "velox", "gigas", "nanus", "obscurus", "splendens",
];

/// Build a binomial species name flavored by diet.
pub fn species_name(diet: Diet, rng: &mut impl Rng) -> String {
    let prefix = GENUS_PREFIXES[rng.gen_range(0..GENUS_PREFIXES.len())];
    let middle = if rng.gen_bool(0.6) {
        GENUS_MIDDLES[rng.gen_range(0..GENUS_MIDDLES.len())]
    } else {
        ""
    };
    let suffixes = genus_suffixes(diet);
    let suffix = suffixes[rng.gen_range(0..suffixes.len())];
    let epithet = EPITHETS[rng.gen_range(0..EPITHETS.len())];
    format!("{}{}{} {}", prefix, middle, suffix, epithet)
}

fn size_word(size: f64) -> &'static str {
    if size < 1.0 {
        "tiny"
    } else if size < 3.0 {
        "small"
    } else if size < 6.0 {
        "medium-sized"
    } else if size < 8.5 {
        "large"
    } else {
        "enormous"
    }
}

fn diet_phrase(diet: Diet) -> &'static str {
    match diet {
        Diet::Photosynthetic => "drawing its energy from sunlight",
        Diet::Herbivore => "grazing on the local flora",
        Diet::Carnivore => "hunting other creatures",
        Diet::Omnivore => "eating whatever it finds",
    }
}

/// One prose line describing a species in its biome.
pub fn describe(species: &SpeciesPopulation, biome: BiomeType) -> String {
    let traits = &species.traits;
    let mut clauses: Vec<&str> = Vec::new();
    if traits.speed() > 7.0 {
        clauses.push("remarkably swift");
    }
    if traits.get(ecogenesis_data::trait_idx::ARMOR) > 6.0 {
        clauses.push("heavily armored");
    }
    if traits.camouflage() > 0.7 {
        clauses.push("nearly invisible against its surroundings");
    }
    if traits.intelligence() > 6.0 {
        clauses.push("unsettlingly clever");
    }
    let extras = if clauses.is_empty() {
        String::new()
    } else {
        format!(" It is {}.", clauses.join(" and "))
    };
    format!(
        "{} is a {} {} of the {}, {}.{}",
        species.name,
        size_word(traits.size()),
        species.diet.name(),
        biome.name(),
        diet_phrase(species.diet),
        extras
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecogenesis_data::{trait_idx, OrganismTraits};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_names_are_binomial() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for diet in [
            Diet::Photosynthetic,
            Diet::Herbivore,
            Diet::Carnivore,
            Diet::Omnivore,
        ] {
            let name = species_name(diet, &mut rng);
            assert_eq!(name.split_whitespace().count(), 2, "{}", name);
        }
    }

    #[test]
    fn test_describe_mentions_biome() {
        let mut traits = OrganismTraits::default();
        traits.set(trait_idx::SIZE, 9.0);
        let species = SpeciesPopulation::new("Gorrexosaurus ferox", traits, 100, 0);
        let text = describe(&species, BiomeType::Grassland);
        assert!(text.contains("grassland"));
        assert!(text.contains("enormous"));
    }
}
