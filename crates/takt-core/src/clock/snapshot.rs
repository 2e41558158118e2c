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

//! Immutable view of the clock state for diagnostics.

use serde::{Deserialize, Serialize};

/// A point-in-time view of the scheduler's clock, taken at a trace point.
///
/// Snapshots are purely observational: a [`DiagnosticsSink`] receives one
/// at every reset, catch-up, early-tick, and normal-step point, and nothing
/// the sink does with it can influence scheduling.
///
/// [`DiagnosticsSink`]: crate::diagnostics::DiagnosticsSink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// The host-loop timestamp of the tick being processed.
    pub t: f64,
    /// The most recently scheduled step boundary.
    pub last_step_time: f64,
    /// The signed drift carry at the moment of the snapshot.
    pub correction: f64,
    /// The fixed step period.
    pub period: f64,
}

impl ClockSnapshot {
    /// Returns how far the observed tick time is past the last boundary.
    ///
    /// Negative when the schedule is ahead of the host clock (the state the
    /// early-tick branch handles).
    #[inline]
    pub fn lag(&self) -> f64 {
        self.t - self.last_step_time
    }
}
