//! Time-of-use electricity rate synthesizer.
//!
//! Generates a plausible hourly price signal per consumer category and appends
//! it to a time-series store.

#[cfg(feature = "api")]
pub mod api;
/// Injectable clocks and top-of-hour arithmetic.
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod io;
pub mod logging;
/// Day previews of the rate signal.
pub mod preview;
pub mod reading;
/// Hourly firing loop and backfill.
pub mod scheduler;
/// Append-only reading stores.
pub mod sink;
pub mod tariff;
