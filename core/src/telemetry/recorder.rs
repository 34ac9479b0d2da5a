//! telemetry/recorder.rs
//! Shared accumulator owned by a `Materializer`.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::snapshot::TelemetrySnapshot;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};
use crate::types::{BlobError, Result};

#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

pub type SharedRecorder = Arc<Mutex<TelemetryRecorder>>;

impl TelemetryRecorder {
    pub fn shared() -> SharedRecorder {
        Arc::new(Mutex::new(Self::default()))
    }

    pub fn record(&mut self, counters: &TelemetryCounters, stage_times: &StageTimes) {
        self.counters.merge(counters);
        self.timer.stage_times.merge(stage_times);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

/// Merge into a shared recorder, if any.
pub fn record_into(
    recorder: Option<&SharedRecorder>,
    counters: &TelemetryCounters,
    stage_times: &StageTimes,
) -> Result<()> {
    if let Some(recorder) = recorder {
        lock(recorder)?.record(counters, stage_times);
    }
    Ok(())
}

/// Snapshot of a shared recorder.
pub fn snapshot_of(recorder: &SharedRecorder) -> Result<TelemetrySnapshot> {
    Ok(lock(recorder)?.snapshot())
}

fn lock(recorder: &SharedRecorder) -> Result<MutexGuard<'_, TelemetryRecorder>> {
    recorder
        .lock()
        .map_err(|_| BlobError::Pipeline("telemetry recorder poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn poisoned() -> SharedRecorder {
        let recorder = TelemetryRecorder::shared();
        let held = recorder.clone();
        let _ = thread::spawn(move || {
            let _guard = held.lock().unwrap();
            panic!("holder died");
        })
        .join();
        recorder
    }

    #[test]
    fn records_and_snapshots() {
        let recorder = TelemetryRecorder::shared();
        let counters = TelemetryCounters { bytes_copied: 9, ..Default::default() };
        record_into(Some(&recorder), &counters, &StageTimes::default()).unwrap();
        assert_eq!(snapshot_of(&recorder).unwrap().counters.bytes_copied, 9);
    }

    #[test]
    fn missing_recorder_is_a_no_op() {
        assert!(record_into(None, &TelemetryCounters::default(), &StageTimes::default()).is_ok());
    }

    #[test]
    fn poisoned_lock_is_a_pipeline_error() {
        let recorder = poisoned();
        let err = record_into(Some(&recorder), &TelemetryCounters::default(), &StageTimes::default())
            .unwrap_err();
        assert_eq!(err, BlobError::Pipeline("telemetry recorder poisoned"));
        assert!(matches!(snapshot_of(&recorder), Err(BlobError::Pipeline(_))));
    }
}
