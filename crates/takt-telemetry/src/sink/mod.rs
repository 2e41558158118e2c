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

//! Ready-made diagnostics sinks.
//!
//! Each sink is independent; [`FanoutSink`] composes several behind the
//! scheduler's single sink slot. Sinks that need readback after being
//! boxed into the scheduler ([`StatsSink`], [`RecordingSink`]) hand out a
//! shared handle before the move.

mod fanout;
mod log_sink;
mod recording;
mod stats;

pub use self::fanout::FanoutSink;
pub use self::log_sink::LogSink;
pub use self::recording::{RecordingSink, TraceLog, TraceRecord};
pub use self::stats::{StatsHandle, StatsSink, StepStats};
