// Parallel copy pool: pure wiring, the byte copying lives in `buffer.rs`.

use std::thread;
use crossbeam::channel::{bounded, Receiver};
use log::{debug, trace};

use crate::blob::types::SegmentList;
use crate::constants::{MAX_COPY_WORKERS, MIN_COPY_JOB_SIZE};
use crate::materialize::buffer::copy_range;
use crate::telemetry::TelemetryCounters;
use crate::types::{BlobError, Result};

/// Leave one core free for the caller, never fewer than one worker.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).clamp(1, MAX_COPY_WORKERS)
}

/// Parallelism configuration for one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyProfile {
    pub worker_count: usize,
    pub job_size: usize,
}

impl CopyProfile {
    /// Split `size` bytes evenly across `workers`, with jobs no smaller than
    /// `MIN_COPY_JOB_SIZE`. Fewer workers are used when there are fewer jobs.
    pub fn dynamic(size: usize, workers: usize) -> Self {
        let workers = workers.clamp(1, MAX_COPY_WORKERS);
        let job_size = size.div_ceil(workers).max(MIN_COPY_JOB_SIZE);
        let jobs = size.div_ceil(job_size).max(1);
        Self { worker_count: workers.min(jobs), job_size }
    }

    pub fn job_count(&self, size: usize) -> usize {
        size.div_ceil(self.job_size)
    }
}

/// A disjoint destination region and the blob offset it starts at.
struct CopyJob<'a> {
    index: usize,
    start: usize,
    dst: &'a mut [u8],
}

/// Copy the whole segment list with a scoped worker pool.
///
/// `buf` must be empty with capacity for the whole list. Blocks the calling
/// thread; callers run this off the async path.
pub(crate) fn run_copy_pool(
    list: &SegmentList,
    profile: &CopyProfile,
    mut buf: Vec<u8>,
) -> Result<(Vec<u8>, TelemetryCounters)> {
    let size = list.size();
    buf.resize(size, 0);

    debug!(
        "[COPY-POOL] {} bytes, {} workers, {} jobs",
        size,
        profile.worker_count,
        profile.job_count(size)
    );

    let counters = thread::scope(|scope| {
        let (job_tx, job_rx) = bounded::<CopyJob<'_>>(profile.worker_count);

        let mut handles = Vec::with_capacity(profile.worker_count);
        for i in 0..profile.worker_count {
            let rx = job_rx.clone();
            handles.push(scope.spawn(move || copy_worker(i, list, rx)));
        }
        drop(job_rx);

        // ---- Dispatch disjoint regions ----
        let mut dispatch_failed = false;
        let mut rest: &mut [u8] = &mut buf;
        let mut start = 0usize;
        let mut index = 0usize;
        while start < size {
            let len = profile.job_size.min(size - start);
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            if job_tx.send(CopyJob { index, start, dst: head }).is_err() {
                dispatch_failed = true;
                break;
            }
            start += len;
            index += 1;
        }
        drop(job_tx);

        // ---- Join ----
        let mut total = TelemetryCounters::default();
        let mut panicked = false;
        for handle in handles {
            match handle.join() {
                Ok(c) => total.merge(&c),
                Err(_) => panicked = true,
            }
        }

        if panicked {
            return Err(BlobError::Pipeline("copy worker panicked"));
        }
        if dispatch_failed {
            return Err(BlobError::Pipeline("copy job channel closed"));
        }
        Ok(total)
    })?;

    Ok((buf, counters))
}

fn copy_worker(id: usize, list: &SegmentList, rx: Receiver<CopyJob<'_>>) -> TelemetryCounters {
    let mut counters = TelemetryCounters::default();
    while let Ok(job) = rx.recv() {
        trace!("[COPY-WORKER-{id}] job {} at {} ({} bytes)", job.index, job.start, job.dst.len());
        copy_range(list, job.start, job.dst, &mut counters);
        counters.parallel_jobs += 1;
    }
    counters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_profile_respects_min_job_size() {
        let p = CopyProfile::dynamic(3 * MIN_COPY_JOB_SIZE, 8);
        assert_eq!(p.job_size, MIN_COPY_JOB_SIZE);
        assert_eq!(p.worker_count, 3);
        assert_eq!(p.job_count(3 * MIN_COPY_JOB_SIZE), 3);
    }

    #[test]
    fn dynamic_profile_splits_evenly() {
        let size = 64 * MIN_COPY_JOB_SIZE;
        let p = CopyProfile::dynamic(size, 4);
        assert_eq!(p.worker_count, 4);
        assert_eq!(p.job_size, 16 * MIN_COPY_JOB_SIZE);
    }

    #[test]
    fn default_workers_is_bounded() {
        let w = default_workers();
        assert!((1..=MAX_COPY_WORKERS).contains(&w));
    }
}
