//! telemetry/mod.rs
//! Counters, stage timers, and immutable snapshots for materialization.

pub mod counters;
pub mod timers;
pub mod snapshot;
pub mod recorder;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
pub use recorder::*;
