//! Per-hour bookkeeping of remaining surplus and unmet demand.

use log::debug;

use crate::error::LedgerError;
use crate::registry::{HOURS_PER_DAY, Registry, Role};

/// A directed transfer of energy from one prosumer to one consumer within one
/// hour. Ephemeral: only its effect on the ledger balances persists.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Hour the transfer happened in.
    pub hour: usize,
    /// 1-based prosumer id.
    pub prosumer: usize,
    /// 1-based consumer id.
    pub consumer: usize,
    /// Transferred quantity (kWh, > 0).
    pub amount_kwh: f32,
}

/// Updated balances returned from a successful apply, so the operator sees
/// live quantities without a second query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationReceipt {
    /// Surplus the prosumer still has this hour (kWh).
    pub prosumer_remaining_kwh: f32,
    /// Demand the consumer still has this hour (kWh).
    pub consumer_remaining_kwh: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LedgerState {
    Open,
    Closed,
}

/// Remaining surplus and demand for one hour as allocations are applied.
///
/// Balances are initialized from the registry's profiles, never go negative,
/// and only decrease while the ledger is open. `close` is the terminal
/// transition; afterwards only reads are allowed and they return the
/// quantities as of the moment of closing.
#[derive(Debug, Clone)]
pub struct HourlyLedger {
    hour: usize,
    remaining_surplus: Vec<f32>,
    remaining_demand: Vec<f32>,
    allocations: Vec<Allocation>,
    delivered_kwh: f32,
    state: LedgerState,
}

impl HourlyLedger {
    /// Opens a fresh ledger for `hour`, seeded from the registry's profiles.
    ///
    /// # Panics
    ///
    /// Panics if `hour >= 24`; the clock never produces such an hour.
    pub fn begin_hour(hour: usize, registry: &Registry) -> Self {
        assert!(hour < HOURS_PER_DAY, "hour must be in 0..24");
        Self {
            hour,
            remaining_surplus: registry
                .generation_profiles()
                .iter()
                .map(|p| p.get(hour))
                .collect(),
            remaining_demand: registry
                .demand_profiles()
                .iter()
                .map(|p| p.get(hour))
                .collect(),
            allocations: Vec::new(),
            delivered_kwh: 0.0,
            state: LedgerState::Open,
        }
    }

    /// The hour this ledger tracks.
    pub fn hour(&self) -> usize {
        self.hour
    }

    /// `true` until [`close`](Self::close) is called.
    pub fn is_open(&self) -> bool {
        self.state == LedgerState::Open
    }

    /// Number of registered prosumers.
    pub fn prosumer_count(&self) -> usize {
        self.remaining_surplus.len()
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.remaining_demand.len()
    }

    fn surplus_index(&self, prosumer: usize) -> Result<usize, LedgerError> {
        let index = prosumer.wrapping_sub(1);
        if index < self.remaining_surplus.len() {
            Ok(index)
        } else {
            Err(LedgerError::UnknownParticipant {
                role: Role::Prosumer,
                id: prosumer,
                count: self.remaining_surplus.len(),
            })
        }
    }

    fn demand_index(&self, consumer: usize) -> Result<usize, LedgerError> {
        let index = consumer.wrapping_sub(1);
        if index < self.remaining_demand.len() {
            Ok(index)
        } else {
            Err(LedgerError::UnknownParticipant {
                role: Role::Consumer,
                id: consumer,
                count: self.remaining_demand.len(),
            })
        }
    }

    /// Surplus prosumer `id` still has this hour.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownParticipant`] if `id` is out of range.
    pub fn remaining_surplus(&self, prosumer: usize) -> Result<f32, LedgerError> {
        Ok(self.remaining_surplus[self.surplus_index(prosumer)?])
    }

    /// Demand consumer `id` still has this hour.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownParticipant`] if `id` is out of range.
    pub fn remaining_demand(&self, consumer: usize) -> Result<f32, LedgerError> {
        Ok(self.remaining_demand[self.demand_index(consumer)?])
    }

    /// Remaining surplus of every prosumer, indexed by `id - 1`.
    pub fn surpluses(&self) -> &[f32] {
        &self.remaining_surplus
    }

    /// Remaining demand of every consumer, indexed by `id - 1`.
    pub fn demands(&self) -> &[f32] {
        &self.remaining_demand
    }

    /// Applies one allocation, all-or-nothing.
    ///
    /// Both balances are validated before either is touched; a rejected apply
    /// leaves the ledger exactly as it was.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::Closed`] after [`close`](Self::close)
    /// * [`LedgerError::UnknownParticipant`] for an out-of-range id
    /// * [`LedgerError::InvalidAmount`] for a non-positive or non-finite amount
    /// * [`LedgerError::OverAllocation`] if the amount exceeds either party's
    ///   remaining quantity
    pub fn apply(
        &mut self,
        prosumer: usize,
        consumer: usize,
        amount_kwh: f32,
    ) -> Result<AllocationReceipt, LedgerError> {
        if self.state == LedgerState::Closed {
            return Err(LedgerError::Closed { hour: self.hour });
        }
        let pi = self.surplus_index(prosumer)?;
        let ci = self.demand_index(consumer)?;
        if !amount_kwh.is_finite() || amount_kwh <= 0.0 {
            return Err(LedgerError::InvalidAmount { amount_kwh });
        }

        let surplus = self.remaining_surplus[pi];
        if amount_kwh > surplus {
            return Err(LedgerError::OverAllocation {
                role: Role::Prosumer,
                id: prosumer,
                requested_kwh: amount_kwh,
                available_kwh: surplus,
            });
        }
        let demand = self.remaining_demand[ci];
        if amount_kwh > demand {
            return Err(LedgerError::OverAllocation {
                role: Role::Consumer,
                id: consumer,
                requested_kwh: amount_kwh,
                available_kwh: demand,
            });
        }

        self.remaining_surplus[pi] = surplus - amount_kwh;
        self.remaining_demand[ci] = demand - amount_kwh;
        self.delivered_kwh += amount_kwh;
        self.allocations.push(Allocation {
            hour: self.hour,
            prosumer,
            consumer,
            amount_kwh,
        });
        debug!(
            "hour {}: prosumer {prosumer} -> consumer {consumer}, {amount_kwh:.3} kWh",
            self.hour
        );

        Ok(AllocationReceipt {
            prosumer_remaining_kwh: self.remaining_surplus[pi],
            consumer_remaining_kwh: self.remaining_demand[ci],
        })
    }

    /// Closes the hour. Terminal; idempotent on an already-closed ledger.
    pub fn close(&mut self) {
        self.state = LedgerState::Closed;
    }

    /// Sum of all applied amounts this hour (kWh).
    pub fn delivered_kwh(&self) -> f32 {
        self.delivered_kwh
    }

    /// Surplus left unallocated across all prosumers (kWh).
    pub fn residual_surplus_kwh(&self) -> f32 {
        self.remaining_surplus.iter().sum()
    }

    /// Demand left unmet across all consumers (kWh).
    pub fn residual_demand_kwh(&self) -> f32 {
        self.remaining_demand.iter().sum()
    }

    /// Allocations applied this hour, in application order.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }
}
