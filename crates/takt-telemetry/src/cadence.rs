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

//! Host-side tick cadence watchdog.

/// Watches the interval between host ticks and flags sustained
/// degradation.
///
/// The host feeds every tick timestamp into [`observe`](Self::observe);
/// intervals are smoothed with an exponential moving average and compared
/// against `target_period * tolerance`. The
/// [`just_degraded`](Self::just_degraded) edge is meant to drive
/// [`note_slow_frame_rate`](takt_core::StepScheduler::note_slow_frame_rate)
/// once per degradation; the watchdog itself never touches the scheduler.
#[derive(Debug, Clone)]
pub struct CadenceMonitor {
    target_period: f64,
    smoothing: f64,
    tolerance: f64,
    ema: Option<f64>,
    previous_t: Option<f64>,
    degraded: bool,
    just_degraded: bool,
}

impl CadenceMonitor {
    /// Creates a monitor for the given target tick period, with a
    /// smoothing factor of 0.2 and a tolerance of 1.5 periods.
    pub fn new(target_period: f64) -> Self {
        Self {
            target_period,
            smoothing: 0.2,
            tolerance: 1.5,
            ema: None,
            previous_t: None,
            degraded: false,
            just_degraded: false,
        }
    }

    /// Sets the EMA smoothing factor. Values outside `(0, 1]` are
    /// clamped; 1.0 means no smoothing at all.
    pub fn with_smoothing(mut self, alpha: f64) -> Self {
        self.smoothing = alpha.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    /// Sets how many target periods the smoothed interval may reach
    /// before the cadence counts as degraded. Values below 1.0 are
    /// clamped to 1.0.
    pub fn with_tolerance(mut self, factor: f64) -> Self {
        self.tolerance = factor.max(1.0);
        self
    }

    /// Feeds one tick timestamp and returns whether the cadence is
    /// currently degraded.
    ///
    /// The first observation only seeds the interval tracking. A
    /// timestamp earlier than the previous one re-seeds the monitor, the
    /// same as [`reset`](Self::reset); stale intervals from before a
    /// discontinuity must not poison the average. When the verdict flips
    /// from healthy to degraded, [`just_degraded`](Self::just_degraded)
    /// reports the transition until the next observation.
    pub fn observe(&mut self, t: f64) -> bool {
        let previous = match self.previous_t {
            Some(previous) if t >= previous => previous,
            _ => {
                self.reset();
                self.previous_t = Some(t);
                return self.degraded;
            }
        };
        self.previous_t = Some(t);

        let interval = t - previous;
        let ema = match self.ema {
            Some(ema) => ema + self.smoothing * (interval - ema),
            None => interval,
        };
        self.ema = Some(ema);
        let was_degraded = self.degraded;
        self.degraded = ema > self.target_period * self.tolerance;
        self.just_degraded = self.degraded && !was_degraded;
        self.degraded
    }

    /// The smoothed tick interval, if at least one interval was observed.
    pub fn smoothed_interval(&self) -> Option<f64> {
        self.ema
    }

    /// Whether the last verdict was "degraded".
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether the last observation crossed from healthy into degraded.
    ///
    /// True for exactly one observation per degradation, so a host can
    /// drive one-shot notifications such as
    /// [`note_slow_frame_rate`](takt_core::StepScheduler::note_slow_frame_rate)
    /// without keeping its own edge state.
    pub fn just_degraded(&self) -> bool {
        self.just_degraded
    }

    /// Clears the interval history, the degraded verdict, and the pending
    /// edge.
    pub fn reset(&mut self) {
        self.ema = None;
        self.previous_t = None;
        self.degraded = false;
        self.just_degraded = false;
    }
}
