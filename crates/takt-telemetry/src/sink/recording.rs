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

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use takt_core::clock::ClockSnapshot;
use takt_core::diagnostics::{DiagnosticsSink, ResyncCause, TemporalAnomaly};

/// One captured trace point, with the clock snapshot it carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceRecord {
    /// The schedule was re-centered.
    Resync {
        /// What triggered the resynchronization.
        cause: ResyncCause,
        /// Clock state after re-centering.
        snapshot: ClockSnapshot,
    },
    /// One whole backlogged period was absorbed.
    CatchUp {
        /// Clock state after the absorption.
        snapshot: ClockSnapshot,
    },
    /// A tick arrived ahead of the next boundary.
    EarlyTick {
        /// Clock state after the correction update.
        snapshot: ClockSnapshot,
    },
    /// A normal advancing step ran.
    Step {
        /// Clock state after the boundary advanced.
        snapshot: ClockSnapshot,
    },
    /// The host handed the scheduler irregular timestamps.
    Anomaly {
        /// The reported irregularity.
        anomaly: TemporalAnomaly,
        /// Clock state at the time of the report.
        snapshot: ClockSnapshot,
    },
}

/// Shared, cloneable view over a [`RecordingSink`]'s captured records.
///
/// Obtained via [`RecordingSink::log`] before the sink is boxed into the
/// scheduler.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl TraceLog {
    /// Copies out every record captured so far.
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of captured records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// Discards every captured record.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Exports the captured records as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.records.lock().unwrap())
    }
}

/// A sink that captures every trace point in memory.
///
/// Intended for tests and post-mortem dumps of short runs; the buffer is
/// unbounded, so it is not meant to stay attached to a long-lived
/// scheduler.
#[derive(Debug, Default)]
pub struct RecordingSink {
    log: TraceLog,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared view for reading records back after the sink has been
    /// handed to the scheduler.
    pub fn log(&self) -> TraceLog {
        self.log.clone()
    }

    fn push(&self, record: TraceRecord) {
        self.log.records.lock().unwrap().push(record);
    }
}

impl DiagnosticsSink for RecordingSink {
    fn resync(&mut self, cause: ResyncCause, snapshot: &ClockSnapshot) {
        self.push(TraceRecord::Resync {
            cause,
            snapshot: *snapshot,
        });
    }

    fn catch_up_step(&mut self, snapshot: &ClockSnapshot) {
        self.push(TraceRecord::CatchUp {
            snapshot: *snapshot,
        });
    }

    fn early_tick(&mut self, snapshot: &ClockSnapshot) {
        self.push(TraceRecord::EarlyTick {
            snapshot: *snapshot,
        });
    }

    fn step(&mut self, snapshot: &ClockSnapshot) {
        self.push(TraceRecord::Step {
            snapshot: *snapshot,
        });
    }

    fn anomaly(&mut self, anomaly: &TemporalAnomaly, snapshot: &ClockSnapshot) {
        self.push(TraceRecord::Anomaly {
            anomaly: *anomaly,
            snapshot: *snapshot,
        });
    }
}
