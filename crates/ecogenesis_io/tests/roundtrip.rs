use ecogenesis_core::{PopulationSimulator, SimConfig};
use ecogenesis_data::{trait_idx, BiomeType, OrganismTraits, SpeciesPopulation};
use ecogenesis_io::{load_snapshot, save_snapshot, snapshot_bytes};
use uuid::Uuid;

fn populated_simulator(seed: u64) -> PopulationSimulator {
    let mut sim = PopulationSimulator::new(Uuid::new_v4(), seed, SimConfig::default());
    let grassland = sim.add_biome(BiomeType::Grassland);
    let ocean = sim.add_biome(BiomeType::Ocean);

    let mut flora = OrganismTraits::default();
    flora.set(trait_idx::AUTOTROPHY, 0.9);
    flora.set(trait_idx::FERTILITY, 0.8);
    let mut grazer = OrganismTraits::default();
    grazer.set(trait_idx::AUTOTROPHY, 0.1);
    grazer.set(trait_idx::HERBIVORE_TENDENCY, 8.0);
    let mut algae = OrganismTraits::default();
    algae.set(trait_idx::AUTOTROPHY, 0.95);
    algae.set(trait_idx::AQUATIC, 0.9);

    sim.introduce_species(grassland, SpeciesPopulation::new("Grass", flora, 1_500, 0))
        .unwrap();
    sim.introduce_species(grassland, SpeciesPopulation::new("Grazer", grazer, 300, 0))
        .unwrap();
    sim.introduce_species(ocean, SpeciesPopulation::new("Algae", algae, 4_000, 0))
        .unwrap();
    sim
}

#[test]
fn test_snapshot_load_is_identity() {
    let mut sim = populated_simulator(7);
    for _ in 0..50 {
        sim.tick();
    }

    let before = snapshot_bytes(&sim).expect("serialize failed");
    let restored: PopulationSimulator = serde_json::from_slice(&before).expect("load failed");
    // Tick zero years, snapshot again: byte-identical.
    let after = snapshot_bytes(&restored).expect("re-serialize failed");
    assert_eq!(before, after);
}

#[test]
fn test_restored_simulator_continues_identically() {
    let mut original = populated_simulator(11);
    for _ in 0..25 {
        original.tick();
    }

    let bytes = snapshot_bytes(&original).unwrap();
    let mut restored: PopulationSimulator = serde_json::from_slice(&bytes).unwrap();

    for _ in 0..25 {
        original.tick();
        restored.tick();
    }
    assert_eq!(
        snapshot_bytes(&original).unwrap(),
        snapshot_bytes(&restored).unwrap()
    );
}

#[test]
fn test_file_round_trip() {
    let mut sim = populated_simulator(13);
    for _ in 0..10 {
        sim.tick();
    }

    let path = std::env::temp_dir().join(format!("ecogenesis-snap-{}.json.gz", Uuid::new_v4()));
    save_snapshot(&sim, &path).expect("save failed");
    let restored = load_snapshot(&path).expect("load failed");
    assert_eq!(
        snapshot_bytes(&sim).unwrap(),
        snapshot_bytes(&restored).unwrap()
    );
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_snapshot_is_not_found() {
    let path = std::env::temp_dir().join("ecogenesis-snap-does-not-exist.json.gz");
    assert!(load_snapshot(&path).is_err());
}
