// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use takt_core::clock::ClockSnapshot;
use takt_core::diagnostics::{DiagnosticsSink, ResyncCause, TemporalAnomaly};

/// Bridges scheduler trace points onto the `log` facade.
///
/// Per-step points go out at trace level so a locked 60Hz loop does not
/// flood the log; resynchronizations at info and anomalies at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    /// Creates a log-bridge sink.
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for LogSink {
    fn resync(&mut self, cause: ResyncCause, snapshot: &ClockSnapshot) {
        log::info!(
            "Resynchronized ({cause:?}) at t={}: boundary={} correction={}",
            snapshot.t,
            snapshot.last_step_time,
            snapshot.correction
        );
    }

    fn catch_up_step(&mut self, snapshot: &ClockSnapshot) {
        log::trace!(
            "Catch-up step to boundary={} (t={} lag={})",
            snapshot.last_step_time,
            snapshot.t,
            snapshot.lag()
        );
    }

    fn early_tick(&mut self, snapshot: &ClockSnapshot) {
        log::trace!(
            "Early tick at t={} ahead of boundary={} (correction={})",
            snapshot.t,
            snapshot.last_step_time,
            snapshot.correction
        );
    }

    fn step(&mut self, snapshot: &ClockSnapshot) {
        log::trace!(
            "Step to boundary={} (t={} correction={})",
            snapshot.last_step_time,
            snapshot.t,
            snapshot.correction
        );
    }

    fn anomaly(&mut self, anomaly: &TemporalAnomaly, snapshot: &ClockSnapshot) {
        log::warn!("Temporal anomaly at t={}: {anomaly:?}", snapshot.t);
    }
}
