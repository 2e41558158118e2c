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

//! Error types for scheduler construction and configuration.

use std::fmt;

/// An error raised while validating scheduler configuration.
///
/// Construction is the only place these can occur; the tick path assumes a
/// validated configuration and performs no re-checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The step period was zero, negative, or not a finite number.
    NonPositivePeriod {
        /// The rejected period value, in milliseconds.
        period: f64,
    },
    /// The stall reset threshold was negative or not a finite number.
    ///
    /// Zero is accepted and means every late tick resynchronizes.
    InvalidResetThreshold {
        /// The rejected threshold value, in milliseconds.
        threshold: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositivePeriod { period } => {
                write!(f, "Step period must be positive and finite, got {period}")
            }
            ConfigError::InvalidResetThreshold { threshold } => {
                write!(
                    f,
                    "Reset threshold must be non-negative and finite, got {threshold}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
