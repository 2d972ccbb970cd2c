use crate::data::genome::GeneticCode;
use crate::data::traits::{CoveringType, Diet, FloraGrowth, OrganismTraits};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deterministic 128-bit id drawn from a world's seeded RNG. Engine-created
/// species, biomes, and pathogens all take their ids from this so that a
/// given seed reproduces identical state.
pub fn uuid_from_rng(rng: &mut impl Rng) -> Uuid {
    Uuid::from_u128(rng.gen())
}

/// A cohort of organisms sharing a trait mean, a diet, and a lineage.
/// Head-count is split into juveniles and adults; juveniles promote at a
/// rate set by the maturity-age trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesPopulation {
    pub id: Uuid,
    pub name: String,
    pub ancestor_id: Option<Uuid>,
    pub juveniles: u64,
    pub adults: u64,
    pub traits: OrganismTraits,
    /// Genetic diversity of the cohort, in [0, 1].
    pub variance: f64,
    pub diet: Diet,
    pub generation: u64,
    pub origin_year: u64,
    pub genome: Option<GeneticCode>,
    pub symbiont_id: Option<Uuid>,
    pub covering: CoveringType,
    pub growth: Option<FloraGrowth>,
    pub peak_head_count: u64,
}

impl SpeciesPopulation {
    pub fn new(
        name: impl Into<String>,
        traits: OrganismTraits,
        head_count: u64,
        origin_year: u64,
    ) -> Self {
        let diet = Diet::classify(&traits);
        let mut species = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ancestor_id: None,
            juveniles: head_count / 4,
            adults: head_count - head_count / 4,
            traits,
            variance: 0.3,
            diet,
            generation: 0,
            origin_year,
            genome: None,
            symbiont_id: None,
            covering: CoveringType::SmoothSkin,
            growth: None,
            peak_head_count: 0,
        };
        species.peak_head_count = species.head_count();
        species
    }

    pub fn head_count(&self) -> u64 {
        self.juveniles + self.adults
    }

    pub fn is_extinct(&self) -> bool {
        self.head_count() == 0
    }

    /// Rescale the cohort to a new total, preserving the juvenile/adult
    /// split. Totals never go negative; the peak is tracked for the fossil
    /// record.
    pub fn set_head_count(&mut self, total: u64) {
        let current = self.head_count();
        if current == 0 {
            self.juveniles = total / 4;
            self.adults = total - total / 4;
        } else {
            let juvenile_share = self.juveniles as f64 / current as f64;
            self.juveniles = (total as f64 * juvenile_share).round() as u64;
            self.adults = total.saturating_sub(self.juveniles);
        }
        if total > self.peak_head_count {
            self.peak_head_count = total;
        }
    }

    /// Kill a fraction of the cohort. Returns the number of deaths.
    pub fn apply_mortality(&mut self, rate: f64) -> u64 {
        let rate = rate.clamp(0.0, 1.0);
        let before = self.head_count();
        self.juveniles = (self.juveniles as f64 * (1.0 - rate)).round() as u64;
        self.adults = (self.adults as f64 * (1.0 - rate)).round() as u64;
        before - self.head_count()
    }

    /// One year of maturation: juveniles become adults at 1/maturity_age.
    pub fn promote_juveniles(&mut self) {
        let rate = (1.0 / self.traits.maturity_age()).clamp(0.0, 1.0);
        let promoted = (self.juveniles as f64 * rate).round() as u64;
        self.juveniles -= promoted.min(self.juveniles);
        self.adults += promoted;
    }

    /// Newborns enter the juvenile pool.
    pub fn add_juveniles(&mut self, count: u64) {
        self.juveniles += count;
        if self.head_count() > self.peak_head_count {
            self.peak_head_count = self.head_count();
        }
    }

    /// Reproductive compatibility with another cohort, when both carry genomes.
    pub fn compatible_with(&self, other: &SpeciesPopulation) -> bool {
        match (&self.genome, &other.genome) {
            (Some(a), Some(b)) => !a.is_incompatible_with(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::traits::trait_idx;

    #[test]
    fn test_head_count_split() {
        let species = SpeciesPopulation::new("Test", OrganismTraits::default(), 1000, 0);
        assert_eq!(species.head_count(), 1000);
        assert_eq!(species.juveniles, 250);
        assert_eq!(species.adults, 750);
    }

    #[test]
    fn test_mortality_never_negative() {
        let mut species = SpeciesPopulation::new("Test", OrganismTraits::default(), 100, 0);
        let deaths = species.apply_mortality(1.5);
        assert_eq!(deaths, 100);
        assert!(species.is_extinct());
    }

    #[test]
    fn test_peak_tracks_growth() {
        let mut species = SpeciesPopulation::new("Test", OrganismTraits::default(), 100, 0);
        species.set_head_count(500);
        species.set_head_count(200);
        assert_eq!(species.peak_head_count, 500);
    }

    #[test]
    fn test_promotion_uses_maturity() {
        let mut traits = OrganismTraits::default();
        traits.set(trait_idx::MATURITY_AGE, 2.0);
        let mut species = SpeciesPopulation::new("Test", traits, 1000, 0);
        let juveniles_before = species.juveniles;
        species.promote_juveniles();
        assert_eq!(species.juveniles, juveniles_before / 2);
    }
}
