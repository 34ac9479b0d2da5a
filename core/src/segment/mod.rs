//! Byte segments.
//!
//! Responsibilities:
//! - Hold a shared handle to immutable storage plus bounds
//! - Narrow bounds without touching the bytes
//!
//! Non-responsibilities:
//! - Ordering (owned by `Blob`)
//! - Copying (owned by `materialize`)

pub mod types;

pub use types::Segment;
