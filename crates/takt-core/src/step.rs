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

//! The contract between the scheduler and the simulation it drives.

use serde::{Deserialize, Serialize};

/// How a step invocation relates to the fixed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// The step reached a period boundary and the schedule advanced.
    Advance,
    /// The tick arrived ahead of the next boundary. The simulation still
    /// receives the real elapsed time, but the schedule boundary stays
    /// put; the drift carry keeps consecutive elapsed times from
    /// double-counting.
    Provisional,
}

impl StepKind {
    /// Whether this invocation left the schedule boundary untouched.
    #[inline]
    pub fn is_provisional(&self) -> bool {
        matches!(self, StepKind::Provisional)
    }
}

/// The simulation advance the scheduler exists to drive.
///
/// This is the scheduler's sole effectful dependency: the scheduler
/// decides *when* to step and *with what elapsed time*, the implementation
/// decides *what* a step computes. An `Err` propagates out of
/// [`on_tick`](crate::StepScheduler::on_tick) unchanged and aborts any
/// in-progress catch-up burst; the scheduler performs no retries.
pub trait StepFunction {
    /// Advances the simulation by `dt` milliseconds.
    ///
    /// For [`StepKind::Advance`] invocations `time` is the schedule
    /// boundary the step reached; for [`StepKind::Provisional`] it is the
    /// observed tick time. `dt` is never negative.
    fn step(&mut self, time: f64, dt: f64, kind: StepKind) -> anyhow::Result<()>;
}
