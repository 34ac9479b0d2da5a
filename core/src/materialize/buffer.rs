use std::sync::Arc;
use std::thread;
use std::time::Instant;
use futures::channel::oneshot;
use log::debug;

use crate::blob::types::SegmentList;
use crate::materialize::config::MaterializeConfig;
use crate::materialize::parallelism::{run_copy_pool, CopyProfile};
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::{BlobError, Result};

/// Reserve exactly `size` bytes, reporting failure instead of aborting.
pub(crate) fn try_alloc(size: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| BlobError::AllocationFailure { requested: size })?;
    Ok(buf)
}

/// Fill `dst` with blob bytes starting at blob offset `start`.
///
/// `start + dst.len()` must not exceed the list size.
pub(crate) fn copy_range(
    list: &SegmentList,
    start: usize,
    dst: &mut [u8],
    counters: &mut TelemetryCounters,
) {
    let first = list.first_overlapping(start);
    let mut pos = list.start_of(first);
    let mut written = 0usize;

    for seg in &list.segments[first..] {
        if written == dst.len() {
            break;
        }
        let lo = (start + written).saturating_sub(pos);
        let n = (seg.len() - lo).min(dst.len() - written);
        dst[written..written + n].copy_from_slice(&seg.as_slice()[lo..lo + n]);
        counters.add_copy(n);
        written += n;
        pos += seg.len();
    }
    debug_assert_eq!(written, dst.len(), "copy_range ran out of segments");
}

/// Append every segment, in order, on the calling thread.
pub(crate) fn copy_sequential(
    list: &SegmentList,
    mut buf: Vec<u8>,
    counters: &mut TelemetryCounters,
) -> Vec<u8> {
    for seg in &list.segments {
        buf.extend_from_slice(seg.as_slice());
        counters.add_copy(seg.len());
    }
    buf
}

/// Copy a segment list into one contiguous `Vec`.
///
/// Large multi-segment lists go to the worker pool on a driver thread and the
/// caller awaits the result; everything else is copied inline. Dropping the
/// returned future abandons the result without touching the source.
pub(crate) async fn materialize_vec(
    list: &Arc<SegmentList>,
    config: &MaterializeConfig,
    counters: &mut TelemetryCounters,
    stage_times: &mut StageTimes,
) -> Result<Vec<u8>> {
    let size = list.size();
    let workers = config.workers();

    let alloc_start = Instant::now();
    let buf = try_alloc(size)?;
    stage_times.add(Stage::Allocate, alloc_start.elapsed());

    let start = Instant::now();
    let use_pool = size >= config.parallel_threshold()
        && list.segments.len() > 1
        && workers > 1;

    let buf = if use_pool {
        let profile = CopyProfile::dynamic(size, workers);
        let (buf, pool_counters) = spawn_copy_pool(list.clone(), profile, buf).await?;
        counters.merge(&pool_counters);
        buf
    } else {
        copy_sequential(list, buf, counters)
    };

    stage_times.add(Stage::Copy, start.elapsed());
    debug!("[MATERIALIZE] copied {} bytes (pool: {})", size, use_pool);
    Ok(buf)
}

async fn spawn_copy_pool(
    list: Arc<SegmentList>,
    profile: CopyProfile,
    buf: Vec<u8>,
) -> Result<(Vec<u8>, TelemetryCounters)> {
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("blob-copy-driver".into())
        .spawn(move || {
            let res = run_copy_pool(&list, &profile, buf);
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(res);
        })
        .map_err(|_| BlobError::Pipeline("failed to spawn copy driver"))?;

    rx.await
        .map_err(|_| BlobError::Pipeline("copy driver exited without a result"))?
}
