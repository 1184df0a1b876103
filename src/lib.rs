//! Operator-directed micro-grid energy exchange simulator.
//!
//! A fixed set of prosumers generates surplus energy across 24 hourly slots
//! and a fixed set of consumers has hourly demand. A human operator decides,
//! hour by hour, how much energy flows from which prosumer to which consumer;
//! the crate tracks remaining balances and folds residuals into an
//! end-of-day summary.
//!
//! State flows through an explicit ownership chain — registry → day
//! simulator → allocation engine → hourly ledger — with no process-wide
//! mutable state. The core never performs I/O; the [`console`] module is the
//! interactive front end and any other driver (test harness, script) can
//! supply requests through the same calls.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod io;
/// Participant registry and per-hour profiles.
pub mod registry;
/// Hourly ledger, allocation engine, and the 24-hour day loop.
pub mod sim;
