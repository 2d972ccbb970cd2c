use crate::data::traits::TRAIT_COUNT;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of defined loci in every genome.
pub const DEFINED_GENES: usize = 100;
/// Number of blank (initially inert) loci in every genome.
pub const BLANK_GENES: usize = 100;

/// Genetic distance at or above which two codes are reproductively incompatible.
pub const DIVERGENCE_THRESHOLD: f64 = 0.35;

/// Locus regions for readability.
pub mod locus {
    pub const BODY_PLAN_END: usize = 5;
    pub const MORPHOLOGY_END: usize = 20;
    pub const BEHAVIOR_END: usize = 50;
}

/// Distance weight of a defined locus. Body-plan loci dominate,
/// minor loci barely register.
pub fn locus_weight(idx: usize) -> f64 {
    if idx <= locus::BODY_PLAN_END {
        10.0
    } else if idx <= locus::MORPHOLOGY_END {
        5.0
    } else if idx <= locus::BEHAVIOR_END {
        2.0
    } else {
        1.0
    }
}

fn weight_total() -> f64 {
    (0..DEFINED_GENES).map(locus_weight).sum()
}

/// A fixed-length genome: 100 defined loci plus 100 blank loci, all in [0, 1].
/// Blank loci contribute nothing until activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticCode {
    pub defined: Vec<f64>,
    pub blank: Vec<f64>,
    pub active_blanks: BTreeSet<usize>,
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self {
            defined: vec![0.5; DEFINED_GENES],
            blank: vec![0.0; BLANK_GENES],
            active_blanks: BTreeSet::new(),
        }
    }
}

impl GeneticCode {
    /// Build a genome from explicit defined loci. Blanks start inert.
    pub fn from_loci(defined: Vec<f64>) -> Self {
        debug_assert_eq!(defined.len(), DEFINED_GENES);
        Self {
            defined: defined.into_iter().map(|v| v.clamp(0.0, 1.0)).collect(),
            blank: vec![0.0; BLANK_GENES],
            active_blanks: BTreeSet::new(),
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let defined = (0..DEFINED_GENES).map(|_| rng.gen_range(0.0..=1.0)).collect();
        let blank = (0..BLANK_GENES).map(|_| rng.gen_range(0.0..=1.0)).collect();
        Self {
            defined,
            blank,
            active_blanks: BTreeSet::new(),
        }
    }

    /// Weighted Euclidean distance over defined loci, normalized to [0, 1].
    pub fn distance(&self, other: &GeneticCode) -> f64 {
        let sum: f64 = self
            .defined
            .iter()
            .zip(other.defined.iter())
            .enumerate()
            .map(|(i, (a, b))| locus_weight(i) * (a - b) * (a - b))
            .sum();
        (sum / weight_total()).sqrt()
    }

    /// Whether two codes have diverged past reproductive compatibility.
    pub fn is_incompatible_with(&self, other: &GeneticCode) -> bool {
        self.distance(other) >= DIVERGENCE_THRESHOLD
    }

    /// Per-locus Bernoulli mutation: each defined locus (and each active
    /// blank locus) flips with probability `rate` and receives a Gaussian
    /// perturbation of scale `magnitude`, clamped back into [0, 1].
    pub fn mutate(&mut self, rate: f64, magnitude: f64, rng: &mut impl Rng) {
        if rate <= 0.0 || magnitude <= 0.0 {
            return;
        }
        let noise = match Normal::new(0.0, magnitude) {
            Ok(n) => n,
            Err(_) => return,
        };
        for v in self.defined.iter_mut() {
            if rng.gen_bool(rate.min(1.0)) {
                *v = (*v + noise.sample(rng)).clamp(0.0, 1.0);
            }
        }
        let active: Vec<usize> = self.active_blanks.iter().copied().collect();
        for idx in active {
            if rng.gen_bool(rate.min(1.0)) {
                let v = &mut self.blank[idx];
                *v = (*v + noise.sample(rng)).clamp(0.0, 1.0);
            }
        }
    }

    /// Single-point crossover. The cut point applies to defined and blank
    /// loci alike; activated blanks are inherited from both parents.
    pub fn crossover(&self, other: &GeneticCode, rng: &mut impl Rng) -> GeneticCode {
        let point = rng.gen_range(1..DEFINED_GENES);
        let mut defined = Vec::with_capacity(DEFINED_GENES);
        defined.extend_from_slice(&self.defined[..point]);
        defined.extend_from_slice(&other.defined[point..]);

        let mut blank = Vec::with_capacity(BLANK_GENES);
        blank.extend_from_slice(&self.blank[..point]);
        blank.extend_from_slice(&other.blank[point..]);

        let active_blanks = self
            .active_blanks
            .union(&other.active_blanks)
            .copied()
            .collect();

        GeneticCode {
            defined,
            blank,
            active_blanks,
        }
    }

    /// Switch a blank locus on. Idempotent; out-of-range indices are refused.
    pub fn activate_blank(&mut self, idx: usize) -> anyhow::Result<()> {
        if idx >= BLANK_GENES {
            anyhow::bail!("blank locus {} out of range 0..{}", idx, BLANK_GENES);
        }
        self.active_blanks.insert(idx);
        Ok(())
    }

    /// Compact hex encoding of the full genome (exact, round-trips).
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity((DEFINED_GENES + BLANK_GENES) * 8 + BLANK_GENES / 8);
        for v in self.defined.iter().chain(self.blank.iter()) {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut bitmap = [0u8; BLANK_GENES / 8];
        for &idx in &self.active_blanks {
            bitmap[idx / 8] |= 1 << (idx % 8);
        }
        bytes.extend_from_slice(&bitmap);
        hex::encode(bytes)
    }

    pub fn from_hex(encoded: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(encoded)?;
        let expected = (DEFINED_GENES + BLANK_GENES) * 8 + BLANK_GENES / 8;
        if bytes.len() != expected {
            anyhow::bail!("genome encoding is {} bytes, expected {}", bytes.len(), expected);
        }
        let mut values = Vec::with_capacity(DEFINED_GENES + BLANK_GENES);
        for chunk in bytes[..(DEFINED_GENES + BLANK_GENES) * 8].chunks_exact(8) {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            values.push(f64::from_le_bytes(raw));
        }
        let blank = values.split_off(DEFINED_GENES);
        let bitmap = &bytes[(DEFINED_GENES + BLANK_GENES) * 8..];
        let mut active_blanks = BTreeSet::new();
        for idx in 0..BLANK_GENES {
            if bitmap[idx / 8] & (1 << (idx % 8)) != 0 {
                active_blanks.insert(idx);
            }
        }
        Ok(Self {
            defined: values,
            blank,
            active_blanks,
        })
    }
}

/// Linear genome-to-phenotype map with per-trait activation thresholds.
///
/// Phenotype = clamp(W·G, 0, 1); traits with a positive threshold pass
/// through a sigmoid centered on that threshold, so they stay silent until
/// the raw expression crosses it. Active blank loci add a 0.2-weighted
/// boost to phenotype index `blank_index % TRAIT_COUNT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionMatrix {
    /// Row-major D×P weights: `weights[locus * TRAIT_COUNT + trait]`.
    pub weights: Vec<f64>,
    /// Per-trait activation thresholds; 0 means always expressed linearly.
    pub thresholds: Vec<f64>,
}

/// Sigmoid steepness for threshold-gated traits.
const ACTIVATION_STEEPNESS: f64 = 10.0;

/// Boost weight contributed by an active blank locus.
const BLANK_BOOST: f64 = 0.2;

impl Default for ExpressionMatrix {
    /// Deterministic wiring: each locus feeds the trait at `locus % P`,
    /// scaled by its region weight, so body-plan loci dominate the traits
    /// they land on. A handful of late-expressing traits carry thresholds.
    fn default() -> Self {
        let mut weights = vec![0.0; DEFINED_GENES * TRAIT_COUNT];
        for l in 0..DEFINED_GENES {
            let t = l % TRAIT_COUNT;
            let w = if l <= locus::BODY_PLAN_END {
                0.5
            } else if l <= locus::MORPHOLOGY_END {
                0.3
            } else if l <= locus::BEHAVIOR_END {
                0.15
            } else {
                0.05
            };
            weights[l * TRAIT_COUNT + t] = w;
            // Secondary contribution keeps traits from depending on a single locus.
            let t2 = (l + 7) % TRAIT_COUNT;
            weights[l * TRAIT_COUNT + t2] += w * 0.4;
        }
        let mut thresholds = vec![0.0; TRAIT_COUNT];
        thresholds[crate::data::traits::trait_idx::TOOL_USE] = 0.6;
        thresholds[crate::data::traits::trait_idx::VENOM] = 0.5;
        thresholds[crate::data::traits::trait_idx::FLIGHT] = 0.7;
        thresholds[crate::data::traits::trait_idx::BIOLUMINESCENCE] = 0.55;
        Self { weights, thresholds }
    }
}

impl ExpressionMatrix {
    pub fn random(rng: &mut impl Rng) -> Self {
        let weights = (0..DEFINED_GENES * TRAIT_COUNT)
            .map(|_| {
                if rng.gen_bool(0.8) {
                    0.0
                } else {
                    rng.gen_range(0.0..0.4)
                }
            })
            .collect();
        let thresholds = (0..TRAIT_COUNT)
            .map(|_| {
                if rng.gen_bool(0.15) {
                    rng.gen_range(0.4..0.8)
                } else {
                    0.0
                }
            })
            .collect();
        Self { weights, thresholds }
    }

    /// Express a genome into a phenotype vector in [0, 1]^P.
    pub fn express(&self, code: &GeneticCode) -> Vec<f64> {
        let mut phenotype = vec![0.0; TRAIT_COUNT];
        for (l, g) in code.defined.iter().enumerate() {
            let row = &self.weights[l * TRAIT_COUNT..(l + 1) * TRAIT_COUNT];
            for (t, w) in row.iter().enumerate() {
                phenotype[t] += w * g;
            }
        }
        for (t, p) in phenotype.iter_mut().enumerate() {
            *p = p.clamp(0.0, 1.0);
            let threshold = self.thresholds[t];
            if threshold > 0.0 {
                *p = 1.0 / (1.0 + (-ACTIVATION_STEEPNESS * (*p - threshold)).exp());
            }
        }
        for &idx in &code.active_blanks {
            let t = idx % TRAIT_COUNT;
            phenotype[t] = (phenotype[t] + BLANK_BOOST * code.blank[idx]).clamp(0.0, 1.0);
        }
        phenotype
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_distance_zero_on_equal() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = GeneticCode::random(&mut rng);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_distance_max_is_one() {
        let a = GeneticCode::from_loci(vec![0.0; DEFINED_GENES]);
        let b = GeneticCode::from_loci(vec![1.0; DEFINED_GENES]);
        assert!((a.distance(&b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_activate_blank_idempotent() {
        let mut code = GeneticCode::default();
        code.activate_blank(12).unwrap();
        code.activate_blank(12).unwrap();
        assert_eq!(code.active_blanks.len(), 1);
        assert!(code.activate_blank(BLANK_GENES).is_err());
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let original = GeneticCode::random(&mut rng);
        let mut mutated = original.clone();
        mutated.mutate(0.0, 0.1, &mut rng);
        assert_eq!(original, mutated);
    }

    #[test]
    fn test_hex_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut code = GeneticCode::random(&mut rng);
        code.activate_blank(3).unwrap();
        code.activate_blank(97).unwrap();
        let decoded = GeneticCode::from_hex(&code.to_hex()).unwrap();
        assert_eq!(code, decoded);
    }

    #[test]
    fn test_expression_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let matrix = ExpressionMatrix::default();
        for _ in 0..20 {
            let code = GeneticCode::random(&mut rng);
            for v in matrix.express(&code) {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_blank_activation_boosts_trait() {
        let matrix = ExpressionMatrix::default();
        let mut code = GeneticCode::from_loci(vec![0.2; DEFINED_GENES]);
        let before = matrix.express(&code);
        let idx = 1; // feeds trait 1, which carries no threshold
        code.blank[idx] = 1.0;
        code.activate_blank(idx).unwrap();
        let after = matrix.express(&code);
        assert!(after[idx % TRAIT_COUNT] > before[idx % TRAIT_COUNT]);
    }
}
