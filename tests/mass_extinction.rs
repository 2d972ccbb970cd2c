//! Mass-extinction detection, the recovery phase, and environmental
//! shock impulses.

mod common;

use common::{herbivore_traits, SimBuilder};
use ecogenesis::ExtinctionEventKind;
use ecogenesis_data::{trait_idx, ExtinctRecord, OrganismTraits, SpeciesPopulation};
use uuid::Uuid;

#[test]
fn test_mass_extinction_detector_enters_recovery() {
    // 100 extinct species back-dated to year 950, 20 survivors, year 1000.
    let mut builder = SimBuilder::new().with_seed(201);
    for i in 0..20 {
        builder = builder.with_species(&format!("Survivor-{}", i), herbivore_traits(), 300);
    }
    let (mut sim, biome_id, _) = builder.build();
    sim.current_year = 1_000;
    for i in 0..100 {
        let casualty =
            SpeciesPopulation::new(format!("Casualty-{}", i), herbivore_traits(), 50, 0);
        sim.fossils.push(ExtinctRecord::from_species(
            &casualty,
            950,
            "asteroid_impact",
            biome_id,
        ));
    }

    assert!(sim.check_for_mass_extinction());
    assert!(sim.recovery.active);
    assert_eq!(sim.recovery.counter, 20_000);
    assert!(sim.speciation.radiation_bonus > 1.0);
}

#[test]
fn test_lilliput_effect_reshapes_body_sizes() {
    let mut large = herbivore_traits();
    large.set(trait_idx::SIZE, 8.0);
    let mut small = herbivore_traits();
    small.set(trait_idx::SIZE, 0.5);

    let (mut sim, biome_id, ids) = SimBuilder::new()
        .with_seed(202)
        .with_species("Lumberer", large, 1_000)
        .with_species("Scurrier", small, 1_000)
        .build();

    sim.recovery.trigger(20_000);
    for _ in 0..10 {
        sim.apply_recovery_effects();
    }

    let biome = sim.biome(biome_id).unwrap();
    assert!(biome.species_by_id(ids[0]).unwrap().head_count() < 1_000);
    assert!(biome.species_by_id(ids[1]).unwrap().head_count() > 1_000);
}

#[test]
fn test_asteroid_flattens_large_slow_witted_species() {
    let mut traits = OrganismTraits::default();
    traits.set(trait_idx::AUTOTROPHY, 0.05);
    traits.set(trait_idx::HERBIVORE_TENDENCY, 8.0);
    traits.set(trait_idx::SIZE, 6.0);
    traits.set(trait_idx::INTELLIGENCE, 0.3);

    let (mut sim, biome_id, ids) = SimBuilder::new()
        .with_seed(203)
        .with_species("Target", traits, 1_000)
        .build();

    sim.apply_extinction_event(ExtinctionEventKind::AsteroidImpact, 0.9).unwrap();
    let survivors = sim
        .biome(biome_id)
        .unwrap()
        .species_by_id(ids[0])
        .map(|s| s.head_count())
        .unwrap_or(0);
    assert!(survivors < 500, "too many survivors: {}", survivors);

    // Keep hitting until the lineage dies; the fossil record must carry
    // the event as the cause.
    for _ in 0..20 {
        if sim.fossils.contains(ids[0]) {
            break;
        }
        sim.apply_extinction_event(ExtinctionEventKind::AsteroidImpact, 1.0).unwrap();
    }
    assert!(sim.fossils.contains(ids[0]));
    let record = sim
        .fossils
        .records
        .iter()
        .find(|r| r.species_id == ids[0])
        .unwrap();
    assert_eq!(record.cause, "asteroid_impact");
}

#[test]
fn test_volcanic_winter_spares_cold_adapted_flora() {
    let mut hardy_flora = common::flora_traits();
    hardy_flora.set(trait_idx::COLD_RESISTANCE, 10.0);
    let soft_fauna = herbivore_traits();

    let (mut sim, biome_id, ids) = SimBuilder::new()
        .with_seed(204)
        .with_species("Frostmoss", hardy_flora, 1_000)
        .with_species("Grazer", soft_fauna, 1_000)
        .build();

    sim.apply_extinction_event(ExtinctionEventKind::VolcanicWinter, 1.0).unwrap();
    let biome = sim.biome(biome_id).unwrap();
    let flora_left = biome.species_by_id(ids[0]).unwrap().head_count();
    let fauna_left = biome.species_by_id(ids[1]).unwrap().head_count();
    assert!(flora_left > fauna_left);
}

#[test]
fn test_ice_age_retags_vulnerable_biomes() {
    let (mut sim, biome_id, _) = SimBuilder::new()
        .with_seed(205)
        .with_biome(ecogenesis::BiomeType::Rainforest)
        .with_species("Canopy", common::flora_traits(), 2_000)
        .build();

    sim.apply_extinction_event(ExtinctionEventKind::IceAge, 0.8).unwrap();
    assert_eq!(
        sim.biome(biome_id).unwrap().biome_type,
        ecogenesis::BiomeType::DeciduousForest
    );
    let events = sim.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        ecogenesis::SimEvent::BiomeTransition { .. }
    )));
}

#[test]
fn test_recovery_phase_expires() {
    let (mut sim, _, _) = SimBuilder::new()
        .with_seed(206)
        .with_config(|c| c.recovery_years = 5)
        .with_species("Grass", common::flora_traits(), 1_500)
        .build();

    sim.recovery.trigger(5);
    sim.speciation.radiation_bonus = 2.0;
    sim.speciation.high_mutation = true;
    for _ in 0..6 {
        sim.tick();
    }
    assert!(!sim.recovery.active);
    assert_eq!(sim.speciation.radiation_bonus, 1.0);
    assert!(!sim.speciation.high_mutation);
}

#[test]
fn test_unknown_species_extinction_is_noop() {
    let (mut sim, _, _) = SimBuilder::new()
        .with_seed(207)
        .with_species("Grass", common::flora_traits(), 1_000)
        .build();
    let before_extant = sim.phylogeny.extant_count;
    sim.phylogeny.mark_extinct(Uuid::new_v4(), 10);
    assert_eq!(sim.phylogeny.extant_count, before_extant);
}
