//! blob-core
//!
//! Immutable binary container with zero-copy slicing and lazy,
//! asynchronous materialization.
//!
//! ```
//! use blob_core::prelude::*;
//!
//! let blob = Blob::new(["hello ", "world"], BlobOptions::with_type("text/plain"));
//! let view = blob.slice(Some(-5), None);
//! assert_eq!(view.size(), 5);
//! assert_eq!(view.content_type(), "");
//!
//! let text = pollster::block_on(view.text()).unwrap();
//! assert_eq!(text, "world");
//! ```

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod segment;
pub mod fragment;
pub mod blob;
pub mod materialize;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::blob::{Blob, BlobCursor, BlobOptions, LineEndings};
    pub use crate::fragment::{Fragment, FragmentKind};
    pub use crate::materialize::{BlobStream, MaterializeConfig, Materializer, ReadResult};
    pub use crate::segment::Segment;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{BlobError, Result};
}
