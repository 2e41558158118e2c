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

//! Scheduler configuration and the scheduling mode gate.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Selects who drives simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleMode {
    /// The scheduler derives step invocations from host-loop ticks.
    SelfScheduled,
    /// Some other component drives steps; every tick is ignored so the
    /// step function is never double-invoked.
    External,
}

impl Default for ScheduleMode {
    fn default() -> Self {
        ScheduleMode::SelfScheduled
    }
}

/// Configuration for a [`StepScheduler`](crate::StepScheduler).
///
/// All durations share one unit with the tick timestamps, milliseconds by
/// convention. Values are validated once at scheduler construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Fixed simulation step duration. Must be positive and finite.
    pub period: f64,
    /// Slack beyond one period before a late tick forces resynchronization
    /// instead of a catch-up burst. Must be non-negative; zero means any
    /// late tick resynchronizes.
    pub reset_threshold: f64,
    /// Host-loop timestamp the schedule starts counting from.
    pub start_time: f64,
    /// Whether this scheduler or an external one drives steps.
    pub mode: ScheduleMode,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            // 60 steps per second, expressed in milliseconds.
            period: 1000.0 / 60.0,
            reset_threshold: 100.0,
            start_time: 0.0,
            mode: ScheduleMode::SelfScheduled,
        }
    }
}

impl StepConfig {
    /// Checks the configuration, returning the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(ConfigError::NonPositivePeriod {
                period: self.period,
            });
        }
        if !self.reset_threshold.is_finite() || self.reset_threshold < 0.0 {
            return Err(ConfigError::InvalidResetThreshold {
                threshold: self.reset_threshold,
            });
        }
        Ok(())
    }

    /// Load scheduler configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load scheduler configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Save scheduler configuration to a JSON file.
    pub fn to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
