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

//! The scheduler's clock state and its observable snapshots.
//!
//! [`ClockState`] is the single piece of mutable timing state in Takt. It
//! is owned exclusively by the [`StepScheduler`](crate::scheduler::StepScheduler)
//! and mutated only through the semantic transitions defined here; no other
//! component reads or writes it. [`ClockSnapshot`] is the immutable view
//! handed to diagnostics at every trace point.
//!
//! All times are `f64` values in the host loop's time unit. The crate's
//! defaults and the sandbox treat that unit as **milliseconds**, but the
//! scheduler only requires that `period`, `reset_threshold`, and the tick
//! timestamps share one unit.

mod snapshot;
mod state;

pub use self::snapshot::ClockSnapshot;
pub use self::state::ClockState;
