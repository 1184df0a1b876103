//! Day simulator: drives the 24-hour loop and folds hourly residuals.

use log::info;

use crate::error::SimulationError;
use crate::registry::Registry;
use crate::sim::clock::HourClock;
use crate::sim::engine::AllocationEngine;
use crate::sim::ledger::HourlyLedger;
use crate::sim::summary::{DaySummary, HourSummary};

/// Owns the registry, the clock, and the cumulative summary; drives hours
/// 0..24 strictly in order.
///
/// Each hour gets a fresh ledger seeded from the registry. The operator
/// callback receives an [`AllocationEngine`] borrowing that ledger and may
/// apply any number of allocations before returning; returning closes the
/// hour (closing early through the engine is equivalent). Residuals are
/// folded into the [`DaySummary`] as each hour closes, and the ledger is
/// discarded before the next hour begins — ledgers never overlap.
pub struct DaySimulator {
    registry: Registry,
    clock: HourClock,
    summary: DaySummary,
    complete: bool,
}

impl DaySimulator {
    /// A simulator positioned before hour 0.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            clock: HourClock::new(),
            summary: DaySummary::new(),
            complete: false,
        }
    }

    /// The participant set being simulated.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// `true` after hour 23 has closed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Hours closed so far.
    pub fn hours_completed(&self) -> usize {
        self.summary.hours().len()
    }

    /// Runs the full day, handing each hour's engine to `operator`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::AlreadyComplete`] if the simulation already ran.
    pub fn run(
        &mut self,
        mut operator: impl FnMut(&mut AllocationEngine),
    ) -> Result<DaySummary, SimulationError> {
        if self.complete {
            return Err(SimulationError::AlreadyComplete);
        }

        while let Some(hour) = self.clock.next_hour() {
            let mut ledger = HourlyLedger::begin_hour(hour, &self.registry);
            {
                let mut engine = AllocationEngine::new(&mut ledger);
                operator(&mut engine);
            }
            ledger.close();

            info!(
                "hour {hour} closed: delivered {:.3} kWh, unmet {:.3} kWh, wasted {:.3} kWh",
                ledger.delivered_kwh(),
                ledger.residual_demand_kwh(),
                ledger.residual_surplus_kwh()
            );
            self.summary.record_hour(HourSummary {
                hour,
                delivered_kwh: ledger.delivered_kwh(),
                unmet_kwh: ledger.residual_demand_kwh(),
                wasted_kwh: ledger.residual_surplus_kwh(),
                allocation_count: ledger.allocations().len(),
            });
        }

        self.complete = true;
        Ok(self.summary.clone())
    }
}
