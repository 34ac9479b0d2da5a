//! telemetry/snapshot.rs
//! Immutable telemetry snapshot, serializable for logs and reports.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// Copied bytes per second of accumulated copy time.
    pub copy_throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let copy_secs = timer.stage_times.get(Stage::Copy).as_secs_f64();
        let throughput = if copy_secs > 0.0 {
            counters.bytes_copied as f64 / copy_secs
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            copy_throughput_bytes_per_sec: throughput,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
