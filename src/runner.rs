//! The per-world driver loop.
//!
//! One runner owns one world; multiple worlds run as independent runners
//! on whatever scheduler the host prefers, sharing nothing. Cancellation
//! is cooperative and lands on year boundaries, so a cancelled run can be
//! resumed later and replay identically.

use crate::world::{EcologyWorld, RunOutcome};
use ecogenesis_core::CancelToken;

pub struct SimulationRunner {
    pub world: EcologyWorld,
    cancel: CancelToken,
}

impl SimulationRunner {
    pub fn new(world: EcologyWorld) -> Self {
        Self {
            world,
            cancel: CancelToken::new(),
        }
    }

    /// Handle the host can use to stop the run at the next year boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drive the world for up to `years` years.
    pub fn run(&mut self, years: u64) -> RunOutcome {
        let start_year = self.world.simulator.current_year;
        tracing::info!(
            world = %self.world.simulator.world_id,
            from_year = start_year,
            years,
            "run starting"
        );
        let outcome = self.world.simulate_years(years, &self.cancel);
        if outcome.years_completed < years {
            tracing::info!(
                world = %self.world.simulator.world_id,
                completed = outcome.years_completed,
                "run cancelled at year boundary"
            );
        }
        outcome
    }
}
