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

use takt_core::clock::ClockSnapshot;
use takt_core::diagnostics::{DiagnosticsSink, ResyncCause, TemporalAnomaly};

/// Forwards every trace point to a list of child sinks, in attachment
/// order.
///
/// The scheduler holds exactly one sink; this is how a host stacks, for
/// example, a [`LogSink`](super::LogSink) next to a
/// [`StatsSink`](super::StatsSink).
#[derive(Default)]
pub struct FanoutSink {
    children: Vec<Box<dyn DiagnosticsSink>>,
}

impl FanoutSink {
    /// Creates a fanout with no children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child sink, builder style.
    pub fn with(mut self, child: Box<dyn DiagnosticsSink>) -> Self {
        self.children.push(child);
        self
    }

    /// Number of attached children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether no child is attached.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl DiagnosticsSink for FanoutSink {
    fn resync(&mut self, cause: ResyncCause, snapshot: &ClockSnapshot) {
        for child in &mut self.children {
            child.resync(cause, snapshot);
        }
    }

    fn catch_up_step(&mut self, snapshot: &ClockSnapshot) {
        for child in &mut self.children {
            child.catch_up_step(snapshot);
        }
    }

    fn early_tick(&mut self, snapshot: &ClockSnapshot) {
        for child in &mut self.children {
            child.early_tick(snapshot);
        }
    }

    fn step(&mut self, snapshot: &ClockSnapshot) {
        for child in &mut self.children {
            child.step(snapshot);
        }
    }

    fn anomaly(&mut self, anomaly: &TemporalAnomaly, snapshot: &ClockSnapshot) {
        for child in &mut self.children {
            child.anomaly(anomaly, snapshot);
        }
    }
}
