//! Defaults applied when `MaterializeConfig` fields are `None`.

/// Blobs at or above this size are copied by the worker pool (8 MiB).
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8 * 1024 * 1024;

/// Smallest region a single copy job is allowed to cover (1 MiB).
pub const MIN_COPY_JOB_SIZE: usize = 1024 * 1024;

/// Upper bound for copy workers regardless of core count.
pub const MAX_COPY_WORKERS: usize = 64;

/// Largest chunk a coalescing stream will emit (64 KiB).
pub const DEFAULT_MAX_CHUNK: usize = 64 * 1024;

/// Number of bytes shown by segment/blob summaries.
pub const PREVIEW_LEN: usize = 16;

/// Newline written for `LineEndings::Native`.
#[cfg(windows)]
pub const NATIVE_NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NATIVE_NEWLINE: &str = "\n";
