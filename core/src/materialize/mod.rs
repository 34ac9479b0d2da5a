//! Materialization: the only layer that copies blob bytes.
//!
//! Responsibilities:
//! - Contiguous buffers (`to_buffer`), decoded text (`to_text`)
//! - Single-pass chunk streams (`to_stream`)
//! - Optional telemetry for everything above
//!
//! Non-responsibilities:
//! - Building or slicing blobs

pub mod config;
pub mod parallelism;
pub mod buffer;
pub mod text;
pub mod stream;

use std::time::Instant;
use bytes::Bytes;
use log::trace;

use crate::blob::Blob;
use crate::telemetry::{record_into, snapshot_of, SharedRecorder, Stage, StageTimes, TelemetryCounters, TelemetryRecorder, TelemetrySnapshot};
use crate::types::Result;

pub use config::MaterializeConfig;
pub use parallelism::CopyProfile;
pub use stream::{BlobStream, ReadResult};

/// Converts blobs into buffers, text, or streams.
///
/// Materializing never mutates the blob and can be repeated any number of
/// times. Cloning a materializer shares its telemetry recorder.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    config: MaterializeConfig,
    recorder: Option<SharedRecorder>,
}

impl Materializer {
    pub fn new(config: MaterializeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, recorder: None })
    }

    /// Record counters and stage times for every operation from now on.
    pub fn with_telemetry(mut self) -> Self {
        self.recorder = Some(TelemetryRecorder::shared());
        self
    }

    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Current telemetry; `None` when telemetry is disabled.
    pub fn snapshot(&self) -> Result<Option<TelemetrySnapshot>> {
        self.recorder.as_ref().map(snapshot_of).transpose()
    }

    /// Contiguous copy of exactly `blob.size()` bytes, in segment order.
    ///
    /// Empty and single-segment blobs are answered with a shared view; no
    /// bytes are copied for them.
    pub async fn to_buffer(&self, blob: &Blob) -> Result<Bytes> {
        let mut counters = TelemetryCounters { buffers_materialized: 1, ..Default::default() };
        let mut stage_times = StageTimes::default();

        let out = match blob.segments() {
            [] => Bytes::new(),
            [only] => {
                counters.add_shared(only.len());
                only.bytes()
            }
            _ => {
                let buf = buffer::materialize_vec(&blob.list, &self.config, &mut counters, &mut stage_times).await?;
                Bytes::from(buf)
            }
        };

        trace!("[MATERIALIZE] buffer of {} bytes", out.len());
        record_into(self.recorder.as_ref(), &counters, &stage_times)?;
        Ok(out)
    }

    /// `to_buffer` followed by lossy UTF-8 decoding. Never fails on bad input.
    pub async fn to_text(&self, blob: &Blob) -> Result<String> {
        let mut counters = TelemetryCounters::default();
        let mut stage_times = StageTimes::default();

        let buf = buffer::materialize_vec(&blob.list, &self.config, &mut counters, &mut stage_times).await?;

        let start = Instant::now();
        let text = text::decode_lossy(buf, &mut counters);
        stage_times.add(Stage::Decode, start.elapsed());

        record_into(self.recorder.as_ref(), &counters, &stage_times)?;
        Ok(text)
    }

    /// Independent, single-pass stream over the blob's segments.
    pub fn to_stream(&self, blob: &Blob) -> BlobStream {
        BlobStream::new(
            blob.list.clone(),
            self.config.coalesce_below,
            self.config.max_chunk(),
            self.recorder.clone(),
        )
    }
}
