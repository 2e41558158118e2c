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

//! Structured trace points emitted from the tick path.
//!
//! Diagnostics are purely observational: the scheduler behaves identically
//! whether a sink is attached or not, and a sink can neither veto nor
//! reorder scheduling decisions.

use crate::clock::ClockSnapshot;
use serde::{Deserialize, Serialize};

/// Why the scheduler discarded its accumulated drift and backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResyncCause {
    /// A [`ResetHandle`](crate::signal::ResetHandle) raised the shared
    /// reset flag.
    ExternalSignal,
    /// The gap since the last step boundary exceeded the period plus the
    /// configured reset threshold.
    Stall,
}

/// An irregularity in the host-supplied tick timestamps.
///
/// Anomalies are reported and survived: the tick still proceeds with
/// clamped elapsed times, and `on_tick` never fails because of one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TemporalAnomaly {
    /// The host clock went backwards between two processed ticks without
    /// an intervening reset.
    TimeReversal {
        /// The previous processed tick's timestamp.
        previous: f64,
        /// The observed, earlier timestamp.
        observed: f64,
    },
}

/// Observer for the scheduler's per-tick timing decisions.
///
/// Every method has a no-op default so implementations override only the
/// trace points they care about. Snapshots are taken after the branch's
/// state transition, so they show the clock the next tick will start from.
pub trait DiagnosticsSink {
    /// A resynchronization re-centered the schedule. Called after
    /// re-centering and before any step invocation of that tick.
    fn resync(&mut self, _cause: ResyncCause, _snapshot: &ClockSnapshot) {}

    /// The catch-up loop absorbed one whole backlogged period.
    fn catch_up_step(&mut self, _snapshot: &ClockSnapshot) {}

    /// A tick arrived ahead of the next boundary and produced a
    /// provisional step.
    fn early_tick(&mut self, _snapshot: &ClockSnapshot) {}

    /// The tick's single normal advancing step ran.
    fn step(&mut self, _snapshot: &ClockSnapshot) {}

    /// The host handed the scheduler irregular timestamps.
    fn anomaly(&mut self, _anomaly: &TemporalAnomaly, _snapshot: &ClockSnapshot) {}
}

/// A sink that discards every trace point. The default when no sink is
/// attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {}
