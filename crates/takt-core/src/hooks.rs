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

//! Pass-through lifecycle extension points.
//!
//! The scheduler forwards these notifications without interpreting them;
//! they exist so layers above the core share one wiring point instead of
//! each patching the host loop.

use serde::{Deserialize, Serialize};

/// Opaque identifier for an object tracked by the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// World lifecycle notifications forwarded by the scheduler.
///
/// All methods default to no-ops so implementations override selectively.
/// None of them interact with the clock.
pub trait WorldHooks {
    /// An object entered the simulated world.
    fn object_added(&mut self, _id: ObjectId) {}

    /// An object left the simulated world.
    fn object_removed(&mut self, _id: ObjectId) {}

    /// The host observed its loop running below the target cadence.
    fn slow_frame_rate(&mut self) {}
}

/// Hooks that ignore every notification. The default when none are
/// attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl WorldHooks for NoopHooks {}
