use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use bytes::{Bytes, BytesMut};
use futures::stream::{FusedStream, Stream};
use log::{trace, warn};

use crate::blob::types::SegmentList;
use crate::telemetry::{record_into, SharedRecorder, Stage, StageTimes, TelemetryCounters};

/// Result of one `read()` pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub value: Option<Bytes>,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// Nothing pulled yet.
    Ready,
    /// Next segment index to emit.
    Chunk(usize),
    Exhausted,
}

/// Lazy, single-pass, forward-only chunk producer over a blob.
///
/// Each pull yields the next segment's bytes as a shared view. With
/// coalescing enabled, runs of short segments are merged into one chunk.
/// Once exhausted the stream stays exhausted; call `Blob::stream` again for
/// a new pass.
#[derive(Debug)]
pub struct BlobStream {
    list: Arc<SegmentList>,
    state: StreamState,
    coalesce_below: Option<usize>,
    max_chunk: usize,
    counters: TelemetryCounters,
    stage_times: StageTimes,
    recorder: Option<SharedRecorder>,
}

impl BlobStream {
    pub(crate) fn new(
        list: Arc<SegmentList>,
        coalesce_below: Option<usize>,
        max_chunk: usize,
        recorder: Option<SharedRecorder>,
    ) -> Self {
        let counters = TelemetryCounters { streams_opened: 1, ..Default::default() };
        BlobStream {
            list,
            state: StreamState::Ready,
            coalesce_below,
            max_chunk,
            counters,
            stage_times: StageTimes::default(),
            recorder,
        }
    }

    /// Pull the next chunk.
    pub async fn read(&mut self) -> ReadResult {
        match self.next_chunk() {
            Some(value) => ReadResult { value: Some(value), done: false },
            None => ReadResult { value: None, done: true },
        }
    }

    /// Stop early and release the segment list.
    pub fn cancel(&mut self) {
        if self.state != StreamState::Exhausted {
            trace!("[STREAM] cancelled at {:?}", self.state);
        }
        self.state = StreamState::Exhausted;
        self.list = Arc::default();
    }

    pub fn is_done(&self) -> bool {
        self.state == StreamState::Exhausted
    }

    /// Advance the state machine by one step.
    fn next_chunk(&mut self) -> Option<Bytes> {
        let index = match self.state {
            StreamState::Ready => 0,
            StreamState::Chunk(i) => i,
            StreamState::Exhausted => return None,
        };

        if index >= self.list.segments.len() {
            trace!("[STREAM] exhausted after {} chunks", self.counters.chunks_streamed);
            self.state = StreamState::Exhausted;
            self.list = Arc::default();
            return None;
        }

        let start = Instant::now();
        let (chunk, next) = self.take_from(index);
        self.stage_times.add(Stage::Stream, start.elapsed());
        self.state = StreamState::Chunk(next);
        Some(chunk)
    }

    /// Build the chunk beginning at segment `index`; returns it with the
    /// index of the following segment.
    fn take_from(&mut self, index: usize) -> (Bytes, usize) {
        let segments = &self.list.segments;
        let first = &segments[index];

        let below = match self.coalesce_below {
            Some(below) if first.len() < below => below,
            _ => {
                self.counters.add_chunk(first.len(), 1);
                return (first.bytes(), index + 1);
            }
        };

        let mut end = index + 1;
        let mut total = first.len();
        while let Some(seg) = segments.get(end) {
            if seg.len() >= below || total + seg.len() > self.max_chunk {
                break;
            }
            total += seg.len();
            end += 1;
        }

        let chunk = if end - index == 1 {
            first.bytes()
        } else {
            let mut out = BytesMut::with_capacity(total);
            for seg in &segments[index..end] {
                out.extend_from_slice(seg.as_slice());
            }
            self.counters.bytes_copied += total as u64;
            out.freeze()
        };

        self.counters.add_chunk(total, end - index);
        (chunk, end)
    }
}

impl Stream for BlobStream {
    type Item = Bytes;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        Poll::Ready(self.get_mut().next_chunk())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = match self.state {
            StreamState::Ready => self.list.segments.len(),
            StreamState::Chunk(i) => self.list.segments.len().saturating_sub(i),
            StreamState::Exhausted => 0,
        };
        let lower = if left > 0 && self.coalesce_below.is_some() { 1 } else { left };
        (lower, Some(left))
    }
}

impl FusedStream for BlobStream {
    fn is_terminated(&self) -> bool {
        self.is_done()
    }
}

impl Drop for BlobStream {
    fn drop(&mut self) {
        if let Err(err) = record_into(self.recorder.as_ref(), &self.counters, &self.stage_times) {
            warn!("[STREAM] telemetry not recorded: {}", err);
        }
    }
}
