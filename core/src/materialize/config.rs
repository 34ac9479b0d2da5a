use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CHUNK, DEFAULT_PARALLEL_THRESHOLD, MAX_COPY_WORKERS};
use crate::materialize::parallelism::default_workers;
use crate::types::{BlobError, Result};

/// Materialization knobs. `None` falls back to the defaults in `constants`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeConfig {
    /// Blobs of at least this many bytes are copied by the worker pool.
    pub parallel_threshold: Option<usize>,

    /// Copy workers; defaults to one less than the core count.
    pub workers: Option<usize>,

    /// When set, streams merge runs of adjacent segments shorter than this.
    /// - `None` → every segment is emitted verbatim (default).
    pub coalesce_below: Option<usize>,

    /// Upper bound for a coalesced chunk.
    pub max_chunk: Option<usize>,
}

impl MaterializeConfig {
    pub fn new(parallel_threshold: Option<usize>, workers: Option<usize>) -> Self {
        Self { parallel_threshold, workers, ..Self::default() }
    }

    /// Never use the worker pool.
    pub fn sequential() -> Self {
        Self { parallel_threshold: Some(usize::MAX), workers: Some(1), ..Self::default() }
    }

    /// Streams coalesce segments shorter than `below` into chunks of at most `max_chunk`.
    pub fn coalescing(below: usize, max_chunk: Option<usize>) -> Self {
        Self { coalesce_below: Some(below), max_chunk, ..Self::default() }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(w) = self.workers {
            if w == 0 || w > MAX_COPY_WORKERS {
                return Err(BlobError::Validation(format!(
                    "invalid workers count: {w}, must be within 1..={MAX_COPY_WORKERS}"
                )));
            }
        }
        if self.max_chunk == Some(0) {
            return Err(BlobError::Validation("max_chunk must be non-zero".into()));
        }
        if self.parallel_threshold == Some(0) {
            return Err(BlobError::Validation("parallel_threshold must be non-zero".into()));
        }
        Ok(())
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD)
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }

    pub fn max_chunk(&self) -> usize {
        self.max_chunk.unwrap_or(DEFAULT_MAX_CHUNK)
    }
}
