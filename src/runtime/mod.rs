//! Runtime Glue
//!
//! The non-deterministic shell around the game logic: a fixed-cadence
//! polling loop that owns the machine, and a status reporter that watches
//! read-only snapshots. Nothing in here makes game decisions.

pub mod driver;
pub mod reporter;

pub use driver::{Driver, DriverConfig};
pub use reporter::status_reporter;
