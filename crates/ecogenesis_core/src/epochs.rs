//! Epoch initialization: age-appropriate starting assemblages.
//!
//! Each epoch × biome pairing materializes a small set of founding species
//! with table-driven head-counts, trait means, coverings, and growth types.

use crate::naming;
use ecogenesis_data::{
    trait_idx, BiomeType, CoveringType, Diet, FloraGrowth, GeneticCode, OrganismTraits,
    SpeciesPopulation,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeologicalEpoch {
    Hadean,
    Archean,
    Proterozoic,
    Cambrian,
    Ordovician,
    Devonian,
    Carboniferous,
    Permian,
    Mesozoic,
    Cenozoic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MesozoicStage {
    Triassic,
    Jurassic,
    Cretaceous,
}

impl GeologicalEpoch {
    pub const ALL: &'static [GeologicalEpoch] = &[
        GeologicalEpoch::Hadean,
        GeologicalEpoch::Archean,
        GeologicalEpoch::Proterozoic,
        GeologicalEpoch::Cambrian,
        GeologicalEpoch::Ordovician,
        GeologicalEpoch::Devonian,
        GeologicalEpoch::Carboniferous,
        GeologicalEpoch::Permian,
        GeologicalEpoch::Mesozoic,
        GeologicalEpoch::Cenozoic,
    ];

    /// Parse a `geological_age` tag such as "cambrian" or
    /// "mesozoic:cretaceous". The stage only matters for the Mesozoic and
    /// defaults to Jurassic.
    pub fn parse(tag: &str) -> Option<(Self, MesozoicStage)> {
        let lower = tag.trim().to_lowercase();
        let (epoch_part, stage_part) = match lower.split_once(':') {
            Some((e, s)) => (e.trim().to_string(), Some(s.trim().to_string())),
            None => (lower, None),
        };
        let epoch = match epoch_part.as_str() {
            "hadean" => GeologicalEpoch::Hadean,
            "archean" => GeologicalEpoch::Archean,
            "proterozoic" => GeologicalEpoch::Proterozoic,
            "cambrian" => GeologicalEpoch::Cambrian,
            "ordovician" => GeologicalEpoch::Ordovician,
            "devonian" => GeologicalEpoch::Devonian,
            "carboniferous" => GeologicalEpoch::Carboniferous,
            "permian" => GeologicalEpoch::Permian,
            "mesozoic" | "triassic" | "jurassic" | "cretaceous" => GeologicalEpoch::Mesozoic,
            "cenozoic" => GeologicalEpoch::Cenozoic,
            _ => return None,
        };
        let stage = match (epoch_part.as_str(), stage_part.as_deref()) {
            ("triassic", _) | (_, Some("triassic")) => MesozoicStage::Triassic,
            ("cretaceous", _) | (_, Some("cretaceous")) => MesozoicStage::Cretaceous,
            _ => MesozoicStage::Jurassic,
        };
        Some((epoch, stage))
    }
}

/// Builder for one founding species of an assemblage.
struct Founder {
    head_count: u64,
    variance: f64,
    covering: CoveringType,
    growth: Option<FloraGrowth>,
    trait_sets: Vec<(usize, f64)>,
}

impl Founder {
    fn flora(head_count: u64, growth: FloraGrowth, size: f64, fertility: f64) -> Self {
        Self {
            head_count,
            variance: 0.3,
            covering: growth.covering(),
            growth: Some(growth),
            trait_sets: vec![
                (trait_idx::AUTOTROPHY, 0.95),
                (trait_idx::MOTILITY, 0.0),
                (trait_idx::SIZE, size),
                (trait_idx::FERTILITY, fertility),
                (trait_idx::PHOTOSYNTHESIS_EFFICIENCY, 0.8),
            ],
        }
    }

    fn grazer(head_count: u64, covering: CoveringType, size: f64) -> Self {
        Self {
            head_count,
            variance: 0.35,
            covering,
            growth: None,
            trait_sets: vec![
                (trait_idx::AUTOTROPHY, 0.05),
                (trait_idx::MOTILITY, 0.7),
                (trait_idx::SIZE, size),
                (trait_idx::HERBIVORE_TENDENCY, 8.5),
                (trait_idx::CARNIVORE_TENDENCY, 1.0),
                (trait_idx::FERTILITY, 0.6),
            ],
        }
    }

    fn hunter(head_count: u64, covering: CoveringType, size: f64, speed: f64) -> Self {
        Self {
            head_count,
            variance: 0.35,
            covering,
            growth: None,
            trait_sets: vec![
                (trait_idx::AUTOTROPHY, 0.05),
                (trait_idx::MOTILITY, 0.8),
                (trait_idx::SIZE, size),
                (trait_idx::SPEED, speed),
                (trait_idx::STRENGTH, (size * 0.8).min(10.0)),
                (trait_idx::CARNIVORE_TENDENCY, 8.5),
                (trait_idx::HERBIVORE_TENDENCY, 1.0),
                (trait_idx::FERTILITY, 0.4),
            ],
        }
    }

    fn omnivore(head_count: u64, covering: CoveringType, size: f64) -> Self {
        Self {
            head_count,
            variance: 0.4,
            covering,
            growth: None,
            trait_sets: vec![
                (trait_idx::AUTOTROPHY, 0.05),
                (trait_idx::MOTILITY, 0.7),
                (trait_idx::SIZE, size),
                (trait_idx::CARNIVORE_TENDENCY, 5.0),
                (trait_idx::HERBIVORE_TENDENCY, 5.0),
                (trait_idx::FERTILITY, 0.5),
            ],
        }
    }

    fn with(mut self, idx: usize, value: f64) -> Self {
        self.trait_sets.push((idx, value));
        self
    }

    fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance;
        self
    }

    fn build(self, aquatic: bool, rng: &mut impl Rng) -> SpeciesPopulation {
        let mut traits = OrganismTraits::default();
        for (idx, value) in &self.trait_sets {
            traits.set(*idx, *value);
        }
        if aquatic {
            traits.set(trait_idx::AQUATIC, 0.9);
        }
        let diet = Diet::classify(&traits);
        let mut species =
            SpeciesPopulation::new(naming::species_name(diet, rng), traits, self.head_count, 0);
        species.id = ecogenesis_data::uuid_from_rng(rng);
        species.variance = self.variance;
        species.covering = self.covering;
        species.growth = self.growth;
        species.genome = Some(GeneticCode::random(rng));
        species
    }
}

/// Materialize the founding assemblage for one biome at one epoch.
pub fn seed_assemblage(
    epoch: GeologicalEpoch,
    stage: MesozoicStage,
    biome: BiomeType,
    rng: &mut impl Rng,
) -> Vec<SpeciesPopulation> {
    let aquatic = biome.is_aquatic();
    let founders: Vec<Founder> = match epoch {
        GeologicalEpoch::Hadean => Vec::new(),
        GeologicalEpoch::Archean => {
            if aquatic {
                // Microbial mats only; life has not left the water.
                vec![Founder::flora(5_000, FloraGrowth::Algae, 0.1, 0.9)
                    .with(trait_idx::COMPLEXITY, 0.05)]
            } else {
                Vec::new()
            }
        }
        GeologicalEpoch::Proterozoic => {
            if aquatic {
                vec![
                    Founder::flora(4_000, FloraGrowth::Algae, 0.2, 0.8),
                    Founder::grazer(500, CoveringType::SmoothSkin, 0.3)
                        .with(trait_idx::COMPLEXITY, 0.2),
                ]
            } else {
                Vec::new()
            }
        }
        GeologicalEpoch::Cambrian => {
            if aquatic {
                vec![
                    Founder::flora(3_000, FloraGrowth::Algae, 0.3, 0.8),
                    Founder::grazer(800, CoveringType::Shell, 0.8)
                        .with(trait_idx::ARMOR, 6.0),
                    Founder::hunter(200, CoveringType::Chitin, 1.5, 4.0)
                        .with(trait_idx::ARMOR, 5.0),
                ]
            } else {
                Vec::new()
            }
        }
        GeologicalEpoch::Ordovician => {
            if aquatic {
                vec![
                    Founder::flora(3_500, FloraGrowth::Algae, 0.4, 0.8),
                    Founder::grazer(900, CoveringType::Shell, 1.0).with(trait_idx::ARMOR, 6.5),
                    Founder::hunter(250, CoveringType::Shell, 2.5, 4.5),
                ]
            } else {
                // Mosses creep onto the shorelines.
                vec![Founder::flora(400, FloraGrowth::Moss, 0.1, 0.5)]
            }
        }
        GeologicalEpoch::Devonian => {
            if aquatic {
                vec![
                    Founder::flora(3_000, FloraGrowth::Algae, 0.5, 0.8),
                    Founder::grazer(800, CoveringType::Scales, 1.5),
                    Founder::hunter(300, CoveringType::Scales, 3.5, 5.5),
                ]
            } else {
                vec![
                    Founder::flora(2_000, FloraGrowth::Fern, 2.0, 0.7),
                    Founder::grazer(300, CoveringType::Chitin, 0.5),
                ]
            }
        }
        GeologicalEpoch::Carboniferous => {
            if aquatic {
                vec![
                    Founder::flora(3_000, FloraGrowth::Algae, 0.5, 0.8),
                    Founder::grazer(700, CoveringType::Scales, 2.0),
                    Founder::hunter(250, CoveringType::Scales, 4.0, 5.0),
                ]
            } else {
                vec![
                    Founder::flora(4_000, FloraGrowth::Tree, 8.0, 0.8),
                    Founder::grazer(1_000, CoveringType::Chitin, 2.0)
                        .with(trait_idx::FLIGHT, 0.6),
                    Founder::hunter(150, CoveringType::Scales, 3.0, 4.0)
                        .with(trait_idx::COLD_RESISTANCE, 2.0),
                ]
            }
        }
        GeologicalEpoch::Permian => {
            if aquatic {
                vec![
                    Founder::flora(2_500, FloraGrowth::Algae, 0.5, 0.7),
                    Founder::grazer(600, CoveringType::Scales, 2.0),
                    Founder::hunter(200, CoveringType::Scales, 3.5, 4.5),
                ]
            } else {
                vec![
                    Founder::flora(2_500, FloraGrowth::Shrub, 3.0, 0.6),
                    Founder::grazer(700, CoveringType::Scales, 3.5)
                        .with(trait_idx::HEAT_RESISTANCE, 5.0),
                    Founder::hunter(180, CoveringType::Scales, 4.0, 4.5)
                        .with(trait_idx::HEAT_RESISTANCE, 5.0),
                ]
            }
        }
        GeologicalEpoch::Mesozoic => {
            if aquatic {
                vec![
                    Founder::flora(3_000, FloraGrowth::Algae, 0.6, 0.8),
                    Founder::grazer(700, CoveringType::Scales, 3.0),
                    Founder::hunter(250, CoveringType::Scales, 6.0, 6.0),
                ]
            } else {
                let mut founders = vec![
                    Founder::flora(3_500, FloraGrowth::Tree, 7.0, 0.7),
                    Founder::grazer(800, CoveringType::Scales, 9.5)
                        .with(trait_idx::STRENGTH, 8.0)
                        .with(trait_idx::LIFESPAN, 60.0),
                    Founder::hunter(200, CoveringType::Scales, 7.0, 6.0)
                        .with(trait_idx::STRENGTH, 8.0),
                ];
                if stage != MesozoicStage::Triassic {
                    founders.push(
                        Founder::omnivore(300, CoveringType::Feathers, 1.5)
                            .with(trait_idx::SPEED, 6.0)
                            .with_variance(0.45),
                    );
                }
                founders
            }
        }
        GeologicalEpoch::Cenozoic => {
            if aquatic {
                vec![
                    Founder::flora(3_000, FloraGrowth::Algae, 0.6, 0.8),
                    Founder::grazer(800, CoveringType::SmoothSkin, 4.0),
                    Founder::hunter(250, CoveringType::SmoothSkin, 6.0, 7.0)
                        .with(trait_idx::INTELLIGENCE, 5.0),
                ]
            } else {
                let mut founders = vec![
                    Founder::flora(3_000, FloraGrowth::Grass, 1.0, 0.9),
                    Founder::grazer(900, CoveringType::Fur, 4.0)
                        .with(trait_idx::SOCIAL, 5.0),
                    Founder::hunter(200, CoveringType::Fur, 3.5, 6.5)
                        .with(trait_idx::INTELLIGENCE, 4.0),
                ];
                if matches!(
                    biome,
                    BiomeType::Rainforest | BiomeType::DeciduousForest
                ) {
                    founders.push(
                        Founder::omnivore(250, CoveringType::Fur, 1.5)
                            .with(trait_idx::INTELLIGENCE, 6.0)
                            .with(trait_idx::SOCIAL, 6.0)
                            .with(trait_idx::TOOL_USE, 2.5)
                            .with(trait_idx::COMMUNICATION, 3.0)
                            .with_variance(0.5),
                    );
                }
                founders
            }
        }
    };

    founders
        .into_iter()
        .map(|f| f.build(aquatic, rng))
        .collect()
}
