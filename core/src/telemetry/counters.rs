//! telemetry/counters.rs
//! Counters collected while materializing blobs.
//!
//! Summary: workers and streams fill their own counters and merge them into
//! the owning recorder once, so the hot copy loop never touches a lock.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub buffers_materialized: u64,
    pub texts_decoded: u64,
    /// Texts that needed U+FFFD replacement.
    pub lossy_decodes: u64,
    pub streams_opened: u64,
    pub chunks_streamed: u64,
    /// Bytes physically copied into new storage.
    pub bytes_copied: u64,
    /// Bytes handed out as shared views without copying.
    pub bytes_shared: u64,
    pub bytes_streamed: u64,
    pub segments_visited: u64,
    pub parallel_jobs: u64,
}

impl TelemetryCounters {
    /// Record one segment (or part of one) copied into a destination buffer.
    pub fn add_copy(&mut self, len: usize) {
        self.segments_visited += 1;
        self.bytes_copied += len as u64;
    }

    /// Record bytes returned by reference instead of being copied.
    pub fn add_shared(&mut self, len: usize) {
        self.segments_visited += 1;
        self.bytes_shared += len as u64;
    }

    /// Record one chunk emitted by a stream, built from `segments` segments.
    pub fn add_chunk(&mut self, len: usize, segments: usize) {
        self.chunks_streamed += 1;
        self.bytes_streamed += len as u64;
        self.segments_visited += segments as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.buffers_materialized += other.buffers_materialized;
        self.texts_decoded += other.texts_decoded;
        self.lossy_decodes += other.lossy_decodes;
        self.streams_opened += other.streams_opened;
        self.chunks_streamed += other.chunks_streamed;
        self.bytes_copied += other.bytes_copied;
        self.bytes_shared += other.bytes_shared;
        self.bytes_streamed += other.bytes_streamed;
        self.segments_visited += other.segments_visited;
        self.parallel_jobs += other.parallel_jobs;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
