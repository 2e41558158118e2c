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

//! # Takt Core
//!
//! Foundational crate for the Takt step engine: a fixed-period step
//! scheduler driven by a variable-rate host loop.
//!
//! The host (render loop, frame callback, test harness) calls
//! [`StepScheduler::on_tick`] once per iteration at whatever rate it
//! happens to run. The scheduler reconciles that irregular tick stream
//! with a simulation that must advance in equal-sized steps: per tick it
//! runs zero, one, or several invocations of the [`StepFunction`]
//! collaborator, carries drift between ticks in the [`ClockState`], and
//! resynchronizes outright when the tick stream was interrupted for too
//! long.
//!
//! [`StepScheduler::on_tick`]: scheduler::StepScheduler::on_tick
//! [`StepFunction`]: step::StepFunction
//! [`ClockState`]: clock::ClockState

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod hooks;
pub mod scheduler;
pub mod signal;
pub mod step;

pub use config::{ScheduleMode, StepConfig};
pub use scheduler::StepScheduler;
