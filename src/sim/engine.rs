//! Operator-facing allocation mediation for a single open hour.

use crate::error::LedgerError;
use crate::sim::ledger::{AllocationReceipt, HourlyLedger};

/// Mediates between the operator's request stream and the hourly ledger.
///
/// The engine borrows the ledger for the duration of one hour; the day
/// simulator owns both and hands the engine to the operator callback. Every
/// mutation the operator can cause goes through [`apply`](Self::apply) or
/// [`close`](Self::close).
pub struct AllocationEngine<'a> {
    ledger: &'a mut HourlyLedger,
}

impl<'a> AllocationEngine<'a> {
    /// Wraps the ledger for one hour of operator interaction.
    pub fn new(ledger: &'a mut HourlyLedger) -> Self {
        Self { ledger }
    }

    /// The hour being allocated.
    pub fn hour(&self) -> usize {
        self.ledger.hour()
    }

    /// `true` while the hour still accepts allocations.
    pub fn is_open(&self) -> bool {
        self.ledger.is_open()
    }

    /// Number of registered prosumers.
    pub fn prosumer_count(&self) -> usize {
        self.ledger.prosumer_count()
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.ledger.consumer_count()
    }

    /// Validates and applies one allocation, returning both updated balances.
    ///
    /// # Errors
    ///
    /// Propagates the ledger's rejection unchanged; see
    /// [`HourlyLedger::apply`]. Rejections leave the hour open so the
    /// operator can retry with corrected values.
    pub fn apply(
        &mut self,
        prosumer: usize,
        consumer: usize,
        amount_kwh: f32,
    ) -> Result<AllocationReceipt, LedgerError> {
        self.ledger.apply(prosumer, consumer, amount_kwh)
    }

    /// Surplus prosumer `id` still has this hour.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownParticipant`] if `id` is out of range.
    pub fn remaining_surplus(&self, prosumer: usize) -> Result<f32, LedgerError> {
        self.ledger.remaining_surplus(prosumer)
    }

    /// Demand consumer `id` still has this hour.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownParticipant`] if `id` is out of range.
    pub fn remaining_demand(&self, consumer: usize) -> Result<f32, LedgerError> {
        self.ledger.remaining_demand(consumer)
    }

    /// Remaining surplus of every prosumer, indexed by `id - 1`.
    pub fn surpluses(&self) -> &[f32] {
        self.ledger.surpluses()
    }

    /// Remaining demand of every consumer, indexed by `id - 1`.
    pub fn demands(&self) -> &[f32] {
        self.ledger.demands()
    }

    /// Lazy read-only pairing helper for manual decision-making.
    ///
    /// Yields every `(prosumer, consumer)` pair where both sides still have a
    /// nonzero remaining quantity, ascending by prosumer id then consumer id.
    /// Does not mutate state and is not a solver; the operator remains in
    /// charge of what actually flows.
    pub fn suggest_matches(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let surpluses = self.ledger.surpluses();
        let demands = self.ledger.demands();
        surpluses
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s > 0.0)
            .flat_map(move |(pi, _)| {
                demands
                    .iter()
                    .enumerate()
                    .filter(|&(_, &d)| d > 0.0)
                    .map(move |(ci, _)| (pi + 1, ci + 1))
            })
    }

    /// Closes the hour early ("skip the rest of this hour").
    ///
    /// Equivalent to the day simulator's own end-of-hour close; idempotent.
    pub fn close(&mut self) {
        self.ledger.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{HOURS_PER_DAY, HourlyProfile, Registry, Weekday};

    fn flat(kwh: f32) -> HourlyProfile {
        HourlyProfile::new([kwh; HOURS_PER_DAY])
    }

    fn registry() -> Registry {
        Registry::with_profiles(
            Weekday::Monday,
            vec![flat(5.0), flat(0.0), flat(2.0)],
            vec![flat(0.0), flat(3.0)],
        )
    }

    #[test]
    fn apply_reports_live_balances() {
        let registry = registry();
        let mut ledger = HourlyLedger::begin_hour(3, &registry);
        let mut engine = AllocationEngine::new(&mut ledger);
        let receipt = engine.apply(1, 2, 2.0).expect("valid allocation");
        assert_eq!(receipt.prosumer_remaining_kwh, 3.0);
        assert_eq!(receipt.consumer_remaining_kwh, 1.0);
        assert_eq!(engine.remaining_surplus(1), Ok(3.0));
    }

    #[test]
    fn suggest_matches_skips_exhausted_parties_in_ascending_order() {
        let registry = registry();
        let mut ledger = HourlyLedger::begin_hour(0, &registry);
        let engine = AllocationEngine::new(&mut ledger);
        // prosumer 2 has no surplus, consumer 1 has no demand
        let pairs: Vec<(usize, usize)> = engine.suggest_matches().collect();
        assert_eq!(pairs, vec![(1, 2), (3, 2)]);
    }

    #[test]
    fn suggest_matches_does_not_mutate() {
        let registry = registry();
        let mut ledger = HourlyLedger::begin_hour(0, &registry);
        let engine = AllocationEngine::new(&mut ledger);
        let first: Vec<_> = engine.suggest_matches().collect();
        let second: Vec<_> = engine.suggest_matches().collect();
        assert_eq!(first, second);
        assert_eq!(engine.remaining_surplus(1), Ok(5.0));
    }

    #[test]
    fn suggest_matches_drains_as_allocations_land() {
        let registry = registry();
        let mut ledger = HourlyLedger::begin_hour(0, &registry);
        let mut engine = AllocationEngine::new(&mut ledger);
        engine.apply(1, 2, 3.0).expect("drains consumer 2");
        assert_eq!(engine.suggest_matches().count(), 0);
    }

    #[test]
    fn close_makes_further_applies_fail() {
        let registry = registry();
        let mut ledger = HourlyLedger::begin_hour(7, &registry);
        let mut engine = AllocationEngine::new(&mut ledger);
        engine.close();
        assert!(!engine.is_open());
        assert_eq!(
            engine.apply(1, 2, 1.0),
            Err(LedgerError::Closed { hour: 7 })
        );
    }
}
