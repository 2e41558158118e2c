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

use crate::diagnostics::ResyncCause;
use crate::hooks::ObjectId;
use serde::{Deserialize, Serialize};

/// Notifications the scheduler publishes for subscribed consumers.
///
/// Events are informational; nothing in the scheduling algorithm depends
/// on whether anyone listens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SchedulerEvent {
    /// The schedule was re-centered, discarding drift and backlog.
    Resynchronized {
        /// What triggered the resynchronization.
        cause: ResyncCause,
        /// The tick timestamp the schedule was re-centered around.
        t: f64,
    },
    /// A single tick absorbed more than one whole backlogged period.
    CatchUpBurst {
        /// How many catch-up steps ran before the final partial period.
        steps: u32,
        /// The tick timestamp that carried the backlog.
        t: f64,
    },
    /// The host reported degraded tick cadence.
    SlowFrameRate,
    /// An object entered the simulated world.
    ObjectAdded {
        /// The object's host-assigned identifier.
        id: ObjectId,
    },
    /// An object left the simulated world.
    ObjectRemoved {
        /// The object's host-assigned identifier.
        id: ObjectId,
    },
}
