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

//! # Takt Telemetry
//!
//! Observability companions for the Takt scheduler: ready-made
//! [`DiagnosticsSink`](takt_core::diagnostics::DiagnosticsSink)
//! implementations (log bridge, in-memory recording, step statistics,
//! fanout composition) and a host cadence watchdog.
//!
//! Everything in this crate is observational. Attaching, stacking, or
//! removing any of it changes no scheduling decision.

#![warn(missing_docs)]

pub mod cadence;
pub mod sink;

pub use cadence::CadenceMonitor;
pub use sink::{
    FanoutSink, LogSink, RecordingSink, StatsHandle, StatsSink, StepStats, TraceLog, TraceRecord,
};
