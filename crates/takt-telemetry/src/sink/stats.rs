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

/// Aggregated counters over a scheduler's trace stream.
///
/// Advancing steps driven by the catch-up loop are counted separately
/// from normal-branch steps; the total number of `Advance` invocations
/// the step function saw is [`total_advances`](Self::total_advances).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// Normal-branch advancing steps.
    pub normal_steps: u64,
    /// Catch-up advancing steps.
    pub catch_up_steps: u64,
    /// Provisional steps from early ticks.
    pub provisional_steps: u64,
    /// Resynchronizations requested through the reset signal.
    pub external_resyncs: u64,
    /// Resynchronizations forced by a stalled tick stream.
    pub stall_resyncs: u64,
    /// Temporal anomalies reported by the scheduler.
    pub anomalies: u64,
    /// Largest drift-correction magnitude seen in any snapshot.
    pub peak_correction: f64,
}

impl StepStats {
    /// Total `Advance` invocations, catch-up and normal combined.
    pub fn total_advances(&self) -> u64 {
        self.normal_steps + self.catch_up_steps
    }

    /// Total step-function invocations of any kind.
    pub fn total_steps(&self) -> u64 {
        self.total_advances() + self.provisional_steps
    }

    /// Total resynchronizations from either cause.
    pub fn total_resyncs(&self) -> u64 {
        self.external_resyncs + self.stall_resyncs
    }

    /// Fraction of advancing steps that were catch-up work, 0.0 when no
    /// step has run.
    pub fn catch_up_share(&self) -> f64 {
        let advances = self.total_advances();
        if advances > 0 {
            self.catch_up_steps as f64 / advances as f64
        } else {
            0.0
        }
    }

    fn observe_correction(&mut self, snapshot: &ClockSnapshot) {
        let magnitude = snapshot.correction.abs();
        if magnitude > self.peak_correction {
            self.peak_correction = magnitude;
        }
    }
}

/// Shared, cloneable reader over a [`StatsSink`]'s counters.
#[derive(Debug, Clone, Default)]
pub struct StatsHandle {
    shared: Arc<Mutex<StepStats>>,
}

impl StatsHandle {
    /// Copies out the current counters.
    pub fn snapshot(&self) -> StepStats {
        *self.shared.lock().unwrap()
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        *self.shared.lock().unwrap() = StepStats::default();
    }
}

/// A sink that aggregates trace points into [`StepStats`].
///
/// Create it, take a [`StatsHandle`] via [`handle`](Self::handle), then
/// box the sink into the scheduler; the handle keeps reading the live
/// counters afterwards.
#[derive(Debug, Default)]
pub struct StatsSink {
    shared: Arc<Mutex<StepStats>>,
}

impl StatsSink {
    /// Creates a sink with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader sharing this sink's counters.
    pub fn handle(&self) -> StatsHandle {
        StatsHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl DiagnosticsSink for StatsSink {
    fn resync(&mut self, cause: ResyncCause, snapshot: &ClockSnapshot) {
        let mut stats = self.shared.lock().unwrap();
        match cause {
            ResyncCause::ExternalSignal => stats.external_resyncs += 1,
            ResyncCause::Stall => stats.stall_resyncs += 1,
        }
        stats.observe_correction(snapshot);
    }

    fn catch_up_step(&mut self, snapshot: &ClockSnapshot) {
        let mut stats = self.shared.lock().unwrap();
        stats.catch_up_steps += 1;
        stats.observe_correction(snapshot);
    }

    fn early_tick(&mut self, snapshot: &ClockSnapshot) {
        let mut stats = self.shared.lock().unwrap();
        stats.provisional_steps += 1;
        stats.observe_correction(snapshot);
    }

    fn step(&mut self, snapshot: &ClockSnapshot) {
        let mut stats = self.shared.lock().unwrap();
        stats.normal_steps += 1;
        stats.observe_correction(snapshot);
    }

    fn anomaly(&mut self, _anomaly: &TemporalAnomaly, snapshot: &ClockSnapshot) {
        let mut stats = self.shared.lock().unwrap();
        stats.anomalies += 1;
        stats.observe_correction(snapshot);
    }
}
