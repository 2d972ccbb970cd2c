//! Migration and biome-transition behavior through the simulator surface.

mod common;

use common::{flora_traits, herbivore_traits, SimBuilder};
use ecogenesis::{BiomeType, EngineError, GeographyContext, PopulationSimulator, SimConfig};
use ecogenesis_core::migration;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

#[test]
fn test_ocean_land_boundary_is_hard() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 601, SimConfig::default());
    let ocean = sim.add_biome(BiomeType::Ocean);
    let shore = sim.add_biome(BiomeType::Grassland);
    let fish = sim
        .introduce_species(
            ocean,
            ecogenesis::SpeciesPopulation::new("Fish", herbivore_traits(), 500, 0),
        )
        .unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(601);
    let result =
        migration::migrate_species(&mut sim.biomes, ocean, shore, fish, 0.5, 10, &mut rng);
    assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
}

#[test]
fn test_founder_population_carries_lineage_and_diversity() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 602, SimConfig::default());
    let home = sim.add_biome(BiomeType::Grassland);
    let frontier = sim.add_biome(BiomeType::DeciduousForest);
    let walker = sim
        .introduce_species(
            home,
            ecogenesis::SpeciesPopulation::new("Walker", herbivore_traits(), 1_000, 0),
        )
        .unwrap();
    sim.biome_mut(home)
        .unwrap()
        .species_by_id_mut(walker)
        .unwrap()
        .variance = 0.5;

    let mut rng = ChaCha8Rng::seed_from_u64(602);
    let moved =
        migration::migrate_species(&mut sim.biomes, home, frontier, walker, 0.3, 50, &mut rng)
            .unwrap();
    assert_eq!(moved, 300);

    let founder = &sim.biome(frontier).unwrap().species[0];
    assert_eq!(founder.ancestor_id, Some(walker));
    assert_eq!(founder.head_count(), 300);
    assert_eq!(founder.origin_year, 50);
    assert!((founder.variance - 0.6).abs() < 1e-12);
    assert_eq!(
        sim.biome(home).unwrap().species_by_id(walker).unwrap().head_count(),
        700
    );
}

#[test]
fn test_crowded_species_spread_through_adjacency() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 603, SimConfig::default());
    let home = sim.add_biome(BiomeType::Grassland);
    let frontier = sim.add_biome(BiomeType::Taiga);
    let mut geography = GeographyContext::new(0.2);
    geography.set_adjacent(home, frontier);
    sim.geography = Some(geography);

    let crowd = sim
        .introduce_species(
            home,
            ecogenesis::SpeciesPopulation::new("Crowd", herbivore_traits(), 4_800, 0),
        )
        .unwrap();
    sim.biome_mut(home)
        .unwrap()
        .species_by_id_mut(crowd)
        .unwrap()
        .variance = 0.8;

    for year in 0..200 {
        sim.apply_migration_step(year);
        if !sim.biome(frontier).unwrap().species.is_empty() {
            break;
        }
    }
    assert!(
        !sim.biome(frontier).unwrap().species.is_empty(),
        "nobody migrated in 200 sweeps"
    );
}

#[test]
fn test_transition_mortality_spares_generalists() {
    let (mut sim, biome_id, ids) = SimBuilder::new()
        .with_seed(604)
        .with_biome(BiomeType::Rainforest)
        .with_species(
            "Specialist",
            {
                let mut t = flora_traits();
                t.set(ecogenesis_data::trait_idx::CAMOUFLAGE, 1.0);
                t.set(ecogenesis_data::trait_idx::HEAT_RESISTANCE, 9.0);
                t
            },
            1_000,
        )
        .with_species("Generalist", flora_traits(), 1_000)
        .build();

    let biome = sim.biome_mut(biome_id).unwrap();
    migration::transition_biome(biome, BiomeType::Taiga, 1.0, 10);

    let specialist = sim.biome(biome_id).unwrap().species_by_id(ids[0]).unwrap();
    let generalist = sim.biome(biome_id).unwrap().species_by_id(ids[1]).unwrap();
    assert!(specialist.head_count() <= generalist.head_count());
}

#[test]
fn test_migration_chance_follows_crowding() {
    let (sim, biome_id, ids) = SimBuilder::new()
        .with_seed(605)
        .with_species("Packed", herbivore_traits(), 4_000)
        .build();
    let biome = sim.biome(biome_id).unwrap();
    let species = biome.species_by_id(ids[0]).unwrap();
    let chance = migration::migration_chance(species, biome);
    assert!(chance > 0.1);
    assert!(chance <= 0.5);
}
