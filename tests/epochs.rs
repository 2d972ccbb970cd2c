//! Epoch bootstrapping through the world facade.

use ecogenesis::{
    BiomeType, Diet, EcologyWorld, EngineError, GeologicalEpoch, PopulationSimulator, SimConfig,
    WorldConfiguration,
};
use ecogenesis_core::epochs::MesozoicStage;
use uuid::Uuid;

fn world_with_age(age: &str) -> Result<EcologyWorld, EngineError> {
    let mut configuration = WorldConfiguration::default();
    configuration.geological_age = age.to_string();
    EcologyWorld::new(configuration, Uuid::new_v4(), 700)
}

#[test]
fn test_hadean_worlds_are_barren() {
    let world = world_with_age("hadean").unwrap();
    assert_eq!(world.simulator.total_species_count(), 0);
}

#[test]
fn test_archean_life_hides_in_the_oceans() {
    let world = world_with_age("archean").unwrap();
    for biome in &world.simulator.biomes {
        if biome.biome_type.is_aquatic() {
            assert_eq!(biome.species.len(), 1);
            assert_eq!(biome.species[0].diet, Diet::Photosynthetic);
        } else {
            assert!(biome.species.is_empty());
        }
    }
}

#[test]
fn test_cambrian_oceans_explode_with_armored_life() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 701, SimConfig::default());
    let ocean = sim.add_biome(BiomeType::Ocean);
    let seeded = sim
        .seed_epoch(ocean, GeologicalEpoch::Cambrian, MesozoicStage::Jurassic)
        .unwrap();
    assert_eq!(seeded, 3);

    let biome = sim.biome(ocean).unwrap();
    let diets: Vec<Diet> = biome.species.iter().map(|s| s.diet).collect();
    assert!(diets.contains(&Diet::Photosynthetic));
    assert!(diets.contains(&Diet::Herbivore));
    assert!(diets.contains(&Diet::Carnivore));
    assert!(biome.species.iter().all(|s| s.traits.aquatic() > 0.5));
}

#[test]
fn test_cretaceous_grasslands_have_feathered_omnivores() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 702, SimConfig::default());
    let plain = sim.add_biome(BiomeType::Grassland);
    sim.seed_epoch(plain, GeologicalEpoch::Mesozoic, MesozoicStage::Cretaceous)
        .unwrap();
    let biome = sim.biome(plain).unwrap();
    assert!(biome
        .species
        .iter()
        .any(|s| s.covering == ecogenesis_data::CoveringType::Feathers
            && s.diet == Diet::Omnivore));

    // The sauropod-grade grazer towers over everything else.
    let largest = biome
        .species
        .iter()
        .map(|s| s.traits.size())
        .fold(0.0, f64::max);
    assert!(largest > 9.0);
}

#[test]
fn test_cenozoic_forests_court_proto_sapience() {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), 703, SimConfig::default());
    let forest = sim.add_biome(BiomeType::Rainforest);
    sim.seed_epoch(forest, GeologicalEpoch::Cenozoic, MesozoicStage::Jurassic)
        .unwrap();
    let biome = sim.biome(forest).unwrap();
    let clever = biome
        .species
        .iter()
        .find(|s| s.diet == Diet::Omnivore)
        .expect("no omnivore in a Cenozoic forest");
    assert!(clever.traits.intelligence() >= 6.0);
    // Promising, but not sapient out of the gate.
    assert!(!clever.traits.is_proto_sapient(false));
}

#[test]
fn test_species_created_events_flow_at_bootstrap() {
    let mut world = world_with_age("cenozoic").unwrap();
    let events = world.simulator.drain_events();
    assert_eq!(events.len(), world.simulator.total_species_count());
}
