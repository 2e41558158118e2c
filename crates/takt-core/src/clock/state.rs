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

//! The mutable clock state and its semantic transitions.

use crate::clock::ClockSnapshot;
use crate::error::ConfigError;

/// The scheduler's timing state: fixed period, last scheduled step
/// boundary, and the signed drift carry between ticks.
///
/// The fields are private on purpose. Reads go through the accessors;
/// writes happen only through the four transitions ([`recenter`],
/// [`absorb_period`], [`defer`], [`advance`]), which are crate-internal so
/// the scheduler is the only mutator. Each transition implements one branch
/// of the dispatch algorithm and returns the elapsed time the step function
/// must see for that branch, already clamped at zero.
///
/// [`recenter`]: ClockState::recenter
/// [`absorb_period`]: ClockState::absorb_period
/// [`defer`]: ClockState::defer
/// [`advance`]: ClockState::advance
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    period: f64,
    last_step_time: f64,
    correction: f64,
}

impl ClockState {
    /// Creates a clock state starting at time zero with no accumulated
    /// drift.
    ///
    /// Fails fast with [`ConfigError::NonPositivePeriod`] when `period` is
    /// zero, negative, or not finite; the hot path never re-checks it.
    pub fn new(period: f64) -> Result<Self, ConfigError> {
        Self::seeded(period, 0.0, 0.0)
    }

    /// Creates a clock state with a caller-supplied boundary and drift
    /// seed.
    pub fn seeded(period: f64, last_step_time: f64, correction: f64) -> Result<Self, ConfigError> {
        if !period.is_finite() || period <= 0.0 {
            return Err(ConfigError::NonPositivePeriod { period });
        }
        Ok(Self {
            period,
            last_step_time,
            correction,
        })
    }

    /// The fixed step period. Immutable for the lifetime of the state.
    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// The host-loop timestamp of the most recently scheduled step
    /// boundary.
    #[inline]
    pub fn last_step_time(&self) -> f64 {
        self.last_step_time
    }

    /// The signed drift carry: positive when the schedule is ahead of the
    /// host clock, negative when behind.
    #[inline]
    pub fn correction(&self) -> f64 {
        self.correction
    }

    /// The next step boundary, `last_step_time + period`.
    #[inline]
    pub fn next_boundary(&self) -> f64 {
        self.last_step_time + self.period
    }

    /// Takes an observational snapshot at tick time `t`.
    #[inline]
    pub fn snapshot(&self, t: f64) -> ClockSnapshot {
        ClockSnapshot {
            t,
            last_step_time: self.last_step_time,
            correction: self.correction,
            period: self.period,
        }
    }

    /// Resynchronizes after a reset: re-centers the step boundary half a
    /// period behind `t`.
    ///
    /// `last_step_time = t - period / 2`, `correction = period / 2`. The
    /// very next normal-path tick then produces one step with a small,
    /// bounded elapsed time instead of a zero-time step or a huge backlog.
    pub(crate) fn recenter(&mut self, t: f64) {
        self.last_step_time = t - self.period * 0.5;
        self.correction = self.period * 0.5;
    }

    /// Absorbs one whole backlogged period (catch-up branch).
    ///
    /// Returns `period + correction` clamped at zero, then advances the
    /// boundary exactly one period and zeroes the carry. Only the first
    /// step of a burst can see a nonzero carry.
    pub(crate) fn absorb_period(&mut self) -> f64 {
        let dt = (self.period + self.correction).max(0.0);
        self.last_step_time += self.period;
        self.correction = 0.0;
        dt
    }

    /// Records a tick that arrived before the next boundary (early-tick
    /// branch).
    ///
    /// Returns `t - last_step_time + correction` clamped at zero and sets
    /// `correction = last_step_time - t`, how far ahead the schedule is.
    /// The boundary does not move. The clamp guards against feedback
    /// between the carry and a still-early sample.
    pub(crate) fn defer(&mut self, t: f64) -> f64 {
        let dt = (t - self.last_step_time + self.correction).max(0.0);
        self.correction = self.last_step_time - t;
        dt
    }

    /// Completes the final partial period of a tick (normal branch).
    ///
    /// Returns `t - last_step_time + correction` clamped at zero, advances
    /// the boundary one period, and recomputes
    /// `correction = last_step_time - t` against the new boundary.
    pub(crate) fn advance(&mut self, t: f64) -> f64 {
        let dt = (t - self.last_step_time + self.correction).max(0.0);
        self.last_step_time += self.period;
        self.correction = self.last_step_time - t;
        dt
    }
}
