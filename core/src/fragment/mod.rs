//! Fragment normalization.
//!
//! Responsibilities:
//! - Accept heterogeneous construction inputs (buffers, arrays, text, blobs)
//! - Reject dynamic inputs of unsupported kind before anything is built
//! - Flatten inputs into an ordered segment list with a cached size
//!
//! Non-responsibilities:
//! - Slicing
//! - Copying bytes

pub mod types;
pub mod normalize;

pub use types::{Fragment, FragmentKind};
pub use normalize::{normalize, Normalized};
