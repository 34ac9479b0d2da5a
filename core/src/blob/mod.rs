//! The immutable blob container and its zero-copy views.

pub mod types;
pub mod slice;
pub mod cursor;

pub use types::{Blob, BlobOptions, LineEndings};
pub use cursor::BlobCursor;
