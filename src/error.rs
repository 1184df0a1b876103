//! Domain errors for registry construction, ledger mutation, and the day loop.

use thiserror::Error;

use crate::registry::Role;

/// Errors raised while building the participant registry.
///
/// Both variants are input-validation failures: they occur before any ledger
/// exists and their messages are shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The day string is not one of the seven weekday names.
    #[error("Invalid day of the week. Please enter a valid day.")]
    InvalidDay,

    /// A participant count was negative.
    #[error("The number of {} must be a non-negative integer.", .role.plural())]
    InvalidCount {
        /// Which count was rejected.
        role: Role,
    },

    /// A participant id outside the registered range was looked up.
    #[error("unknown {role} id {id} (registered: 1..={count})")]
    UnknownParticipant {
        /// Role the id was scoped to.
        role: Role,
        /// The 1-based id that was requested.
        id: usize,
        /// Number of participants registered for that role.
        count: usize,
    },
}

/// Errors raised by [`HourlyLedger`](crate::sim::ledger::HourlyLedger) when an
/// allocation request is rejected.
///
/// Every variant is recoverable: the ledger is left unchanged and the operator
/// may retry with corrected values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An allocation named a participant id that is not registered.
    #[error("unknown {role} id {id} (registered: 1..={count})")]
    UnknownParticipant {
        /// Role the id was scoped to.
        role: Role,
        /// The 1-based id that was requested.
        id: usize,
        /// Number of participants registered for that role.
        count: usize,
    },

    /// The requested amount exceeds one party's remaining quantity.
    #[error(
        "cannot allocate {requested_kwh:.3} kWh: {role} {id} has {available_kwh:.3} kWh remaining"
    )]
    OverAllocation {
        /// Side whose balance would go negative.
        role: Role,
        /// The 1-based id of that participant.
        id: usize,
        /// Amount the operator asked for.
        requested_kwh: f32,
        /// Amount still available on that side.
        available_kwh: f32,
    },

    /// The requested amount was zero, negative, or not a number.
    #[error("allocation amount must be a positive quantity, got {amount_kwh}")]
    InvalidAmount {
        /// The rejected amount.
        amount_kwh: f32,
    },

    /// The hour has been closed; only reads are allowed.
    #[error("hour {hour} is closed; no further allocations accepted")]
    Closed {
        /// The hour the ledger was tracking.
        hour: usize,
    },
}

/// Errors raised by the [`DaySimulator`](crate::sim::day::DaySimulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The 24-hour loop already ran to completion; fatal to the current run.
    #[error("the 24-hour simulation has already completed")]
    AlreadyComplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_day_message_is_the_operator_literal() {
        let msg = RegistryError::InvalidDay.to_string();
        assert_eq!(msg, "Invalid day of the week. Please enter a valid day.");
    }

    #[test]
    fn invalid_count_message_names_the_role() {
        let prosumers = RegistryError::InvalidCount {
            role: Role::Prosumer,
        };
        assert_eq!(
            prosumers.to_string(),
            "The number of prosumers must be a non-negative integer."
        );
        let consumers = RegistryError::InvalidCount {
            role: Role::Consumer,
        };
        assert_eq!(
            consumers.to_string(),
            "The number of consumers must be a non-negative integer."
        );
    }

    #[test]
    fn over_allocation_message_carries_both_quantities() {
        let err = LedgerError::OverAllocation {
            role: Role::Prosumer,
            id: 2,
            requested_kwh: 7.5,
            available_kwh: 3.25,
        };
        let msg = err.to_string();
        assert!(msg.contains("7.500"));
        assert!(msg.contains("3.250"));
        assert!(msg.contains("prosumer 2"));
    }

    #[test]
    fn closed_message_names_the_hour() {
        let err = LedgerError::Closed { hour: 17 };
        assert!(err.to_string().contains("hour 17"));
    }
}
