use thiserror::Error;

/// Unified error for blob construction and materialization.
/// - Slicing never fails: out-of-range indices are clamped.
/// - Text decoding never fails: invalid UTF-8 is replaced with U+FFFD.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// A dynamic fragment was not one of buffer, array, text or blob.
    #[error("unsupported fragment kind: {kind}")]
    UnsupportedFragmentKind { kind: String },

    /// The contiguous destination buffer could not be reserved.
    #[error("allocation failure: could not reserve {requested} bytes")]
    AllocationFailure { requested: usize },

    /// Copy pool worker vanished before reporting its job.
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),

    /// Invalid configuration with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, BlobError>;

impl From<serde_json::Error> for BlobError {
    fn from(e: serde_json::Error) -> Self {
        BlobError::Validation(e.to_string())
    }
}
