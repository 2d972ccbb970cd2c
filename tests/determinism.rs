use ecogenesis::{snapshot_bytes, EcologyWorld, WorldConfiguration};
use uuid::Uuid;

fn run_world(world_id: Uuid, seed: u64, years: u64) -> Vec<u8> {
    let mut configuration = WorldConfiguration::default();
    configuration.name = "Determinism".to_string();
    configuration.geological_age = "cenozoic".to_string();
    let mut world = EcologyWorld::new(configuration, world_id, seed).unwrap();
    for _ in 0..years {
        world.update();
    }
    snapshot_bytes(&world.simulator).unwrap()
}

#[test]
fn test_same_seed_same_world_is_bitwise_identical() {
    let world_id = Uuid::from_u128(0xfeed_beef);
    let a = run_world(world_id, 12_345, 300);
    let b = run_world(world_id, 12_345, 300);
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_diverge() {
    let world_id = Uuid::from_u128(0xfeed_beef);
    let a = run_world(world_id, 1, 300);
    let b = run_world(world_id, 2, 300);
    assert_ne!(a, b);
}

#[test]
fn test_determinism_survives_cadenced_subsystems() {
    // Long enough to cross evolution (1k), disease (500), migration (2k),
    // and isolation (1k) cadences.
    let world_id = Uuid::from_u128(0xabad_cafe);
    let a = run_world(world_id, 777, 2_500);
    let b = run_world(world_id, 777, 2_500);
    assert_eq!(a, b);
}
