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

use crate::clock::ClockState;
use crate::config::{ScheduleMode, StepConfig};
use crate::diagnostics::{DiagnosticsSink, NullSink, ResyncCause, TemporalAnomaly};
use crate::error::ConfigError;
use crate::event::SchedulerEvent;
use crate::hooks::{NoopHooks, ObjectId, WorldHooks};
use crate::signal::{ResetHandle, ResetSignal};
use crate::step::{StepFunction, StepKind};

/// Reconciles a fixed-period simulation with a variable-rate host loop.
///
/// The host calls [`on_tick`](Self::on_tick) once per loop iteration with
/// its current monotonic time. Each processed tick runs one pass of the
/// dispatch pipeline:
///
/// 1. **Resynchronize** when the external reset flag was raised or the
///    gap since the last boundary exceeds `period + reset_threshold`:
///    re-center the boundary half a period behind `t` and carry half a
///    period of correction, discarding drift and backlog.
/// 2. **Catch up** while more than one whole period is backlogged: one
///    fixed-size step per period, so simulations that assume bounded
///    per-step time survive large gaps.
/// 3. **Defer** when the tick arrived ahead of the next boundary: one
///    provisional step carrying the real elapsed time, boundary untouched.
/// 4. **Advance** otherwise: exactly one normal step for the final
///    partial period, with the drift carry folded into its elapsed time.
///
/// A tick runs either the defer branch or the advance branch, never both;
/// a catch-up burst always falls through to one advancing step for the
/// remainder. Elapsed time handed to the step function is clamped at zero
/// in every branch.
///
/// The scheduler is single-threaded by contract: callers serialize
/// `on_tick` externally. The one cross-thread affordance is the
/// [`ResetHandle`] returned by [`reset_handle`](Self::reset_handle).
pub struct StepScheduler<F: StepFunction> {
    clock: ClockState,
    mode: ScheduleMode,
    reset_threshold: f64,
    reset: ResetSignal,
    step_fn: F,
    diagnostics: Box<dyn DiagnosticsSink>,
    hooks: Box<dyn WorldHooks>,
    events: Option<flume::Sender<SchedulerEvent>>,
    previous_tick: Option<f64>,
}

impl<F: StepFunction> StepScheduler<F> {
    /// Creates a scheduler from a validated configuration.
    ///
    /// ## Arguments
    /// * `config` - Period, reset threshold, start time, and mode gate.
    /// * `step_fn` - The simulation advance this scheduler drives.
    ///
    /// Fails fast with a [`ConfigError`] on a non-positive period or a
    /// negative reset threshold; the tick path never re-validates.
    pub fn new(config: StepConfig, step_fn: F) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = ClockState::seeded(config.period, config.start_time, 0.0)?;
        log::debug!(
            "StepScheduler created: period={}ms threshold={}ms start={} mode={:?}",
            config.period,
            config.reset_threshold,
            config.start_time,
            config.mode
        );
        Ok(Self {
            clock,
            mode: config.mode,
            reset_threshold: config.reset_threshold,
            reset: ResetSignal::new(),
            step_fn,
            diagnostics: Box::new(NullSink),
            hooks: Box::new(NoopHooks),
            events: None,
            previous_tick: None,
        })
    }

    /// Attaches a diagnostics sink, replacing the default discarding one.
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Attaches world lifecycle hooks, replacing the default no-ops.
    pub fn with_hooks(mut self, hooks: Box<dyn WorldHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Attaches a sender for [`SchedulerEvent`] publication.
    ///
    /// Typically the sender end of an
    /// [`EventBus`](crate::event::EventBus) owned by the host.
    pub fn with_event_sender(mut self, sender: flume::Sender<SchedulerEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// The fixed step period, in milliseconds.
    #[inline]
    pub fn period(&self) -> f64 {
        self.clock.period()
    }

    /// The current scheduling mode.
    #[inline]
    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    /// Switches who drives steps.
    ///
    /// Host-side setter, called from the same thread as `on_tick`. A
    /// pending reset survives a stay in [`ScheduleMode::External`] and
    /// fires on the first self-scheduled tick after switching back.
    pub fn set_mode(&mut self, mode: ScheduleMode) {
        if self.mode != mode {
            log::debug!("Schedule mode changed: {:?} -> {mode:?}", self.mode);
        }
        self.mode = mode;
    }

    /// Read-only view of the clock state.
    #[inline]
    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// A thread-safe handle for requesting resynchronization.
    pub fn reset_handle(&self) -> ResetHandle {
        self.reset.handle()
    }

    /// The simulation this scheduler drives.
    #[inline]
    pub fn step_fn(&self) -> &F {
        &self.step_fn
    }

    /// Mutable access to the simulation this scheduler drives.
    #[inline]
    pub fn step_fn_mut(&mut self) -> &mut F {
        &mut self.step_fn
    }

    /// Processes one host-loop tick.
    ///
    /// ## Arguments
    /// * `t` - Current host-loop time, same unit as the period. Must be
    ///   non-decreasing across calls in the absence of a reset; a
    ///   violation is reported through the diagnostics sink as a
    ///   [`TemporalAnomaly`] and survived with clamped elapsed times.
    /// * `dt_hint` - Host-reported elapsed time since the previous tick.
    ///   Logged for trace correlation; the scheduler recomputes elapsed
    ///   time from its own state.
    ///
    /// Invokes the step function zero or more times as described on
    /// [`StepScheduler`]. In [`ScheduleMode::External`] this is a complete
    /// no-op: no state is touched and a pending reset stays pending.
    ///
    /// The only error source is the step function itself; its failure
    /// propagates immediately, aborting any in-progress catch-up burst.
    /// The clock keeps the boundary of the last completed step, so a
    /// caller that survives the failure resumes from where the burst
    /// stopped.
    pub fn on_tick(&mut self, t: f64, dt_hint: f64) -> anyhow::Result<()> {
        if self.mode != ScheduleMode::SelfScheduled {
            log::trace!("Tick ignored, external stepping active (t={t})");
            return Ok(());
        }
        log::trace!("Tick t={t} dt_hint={dt_hint}");

        // Consume the flag exactly once per processed tick, before any
        // other decision.
        let external = self.reset.take();
        let stalled = t > self.clock.next_boundary() + self.reset_threshold;

        if !external {
            if let Some(previous) = self.previous_tick {
                if t < previous {
                    let anomaly = TemporalAnomaly::TimeReversal {
                        previous,
                        observed: t,
                    };
                    log::warn!("Host clock went backwards: {previous} -> {t}");
                    self.diagnostics.anomaly(&anomaly, &self.clock.snapshot(t));
                }
            }
        }
        self.previous_tick = Some(t);

        if external || stalled {
            let cause = if external {
                ResyncCause::ExternalSignal
            } else {
                ResyncCause::Stall
            };
            self.clock.recenter(t);
            log::debug!(
                "Resynchronized ({cause:?}) at t={t}: boundary re-centered to {}",
                self.clock.last_step_time()
            );
            self.diagnostics.resync(cause, &self.clock.snapshot(t));
            self.publish(SchedulerEvent::Resynchronized { cause, t });
        }

        // Catch-up: absorb whole backlogged periods one fixed step at a
        // time. Only the first step of a burst carries a nonzero
        // correction.
        let mut burst = 0u32;
        while t > self.clock.next_boundary() {
            let dt = self.clock.absorb_period();
            let boundary = self.clock.last_step_time();
            self.diagnostics.catch_up_step(&self.clock.snapshot(t));
            self.step_fn.step(boundary, dt, StepKind::Advance)?;
            burst += 1;
        }
        if burst > 0 {
            log::debug!("Caught up {burst} backlogged steps at t={t}");
            self.publish(SchedulerEvent::CatchUpBurst { steps: burst, t });
        }

        // Early tick: ahead of the boundary, report elapsed time without
        // advancing the schedule.
        if t < self.clock.last_step_time() {
            let dt = self.clock.defer(t);
            self.diagnostics.early_tick(&self.clock.snapshot(t));
            self.step_fn.step(t, dt, StepKind::Provisional)?;
            return Ok(());
        }

        // Normal: exactly one step for the final partial period.
        let dt = self.clock.advance(t);
        let boundary = self.clock.last_step_time();
        self.diagnostics.step(&self.clock.snapshot(t));
        self.step_fn.step(boundary, dt, StepKind::Advance)?;
        Ok(())
    }

    /// Forwards an object-added notification and publishes the matching
    /// event. Does not interact with the clock.
    pub fn add_object(&mut self, id: ObjectId) {
        self.hooks.object_added(id);
        self.publish(SchedulerEvent::ObjectAdded { id });
    }

    /// Forwards an object-removed notification and publishes the matching
    /// event. Does not interact with the clock.
    pub fn remove_object(&mut self, id: ObjectId) {
        self.hooks.object_removed(id);
        self.publish(SchedulerEvent::ObjectRemoved { id });
    }

    /// Forwards a degraded-cadence notification from the host and
    /// publishes the matching event.
    pub fn note_slow_frame_rate(&mut self) {
        log::debug!("Host reported a slow frame rate");
        self.hooks.slow_frame_rate();
        self.publish(SchedulerEvent::SlowFrameRate);
    }

    fn publish(&self, event: SchedulerEvent) {
        if let Some(sender) = &self.events {
            if let Err(e) = sender.send(event) {
                log::error!("Failed to send scheduler event: {e}. Receiver likely disconnected.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockSnapshot;
    use crate::event::EventBus;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    /// Step double that records every invocation and can fail on demand.
    #[derive(Default)]
    struct RecordingStep {
        calls: Vec<(f64, f64, StepKind)>,
        fail_at: Option<usize>,
    }

    impl StepFunction for RecordingStep {
        fn step(&mut self, time: f64, dt: f64, kind: StepKind) -> anyhow::Result<()> {
            self.calls.push((time, dt, kind));
            if self.fail_at == Some(self.calls.len()) {
                anyhow::bail!("injected step failure");
            }
            Ok(())
        }
    }

    /// Sink double pushing one label per trace point into a shared log.
    struct TraceSink {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl DiagnosticsSink for TraceSink {
        fn resync(&mut self, cause: ResyncCause, _snapshot: &ClockSnapshot) {
            self.entries.lock().unwrap().push(format!("resync:{cause:?}"));
        }

        fn catch_up_step(&mut self, _snapshot: &ClockSnapshot) {
            self.entries.lock().unwrap().push("catch_up".to_string());
        }

        fn early_tick(&mut self, _snapshot: &ClockSnapshot) {
            self.entries.lock().unwrap().push("early".to_string());
        }

        fn step(&mut self, _snapshot: &ClockSnapshot) {
            self.entries.lock().unwrap().push("step".to_string());
        }

        fn anomaly(&mut self, anomaly: &TemporalAnomaly, _snapshot: &ClockSnapshot) {
            self.entries
                .lock()
                .unwrap()
                .push(format!("anomaly:{anomaly:?}"));
        }
    }

    fn scheduler(period: f64) -> StepScheduler<RecordingStep> {
        let config = StepConfig {
            period,
            ..Default::default()
        };
        StepScheduler::new(config, RecordingStep::default()).expect("Config should be valid")
    }

    fn traced(period: f64) -> (StepScheduler<RecordingStep>, Arc<Mutex<Vec<String>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let sink = TraceSink {
            entries: Arc::clone(&entries),
        };
        (scheduler(period).with_diagnostics(Box::new(sink)), entries)
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = StepConfig {
            period: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            StepScheduler::new(config, RecordingStep::default()),
            Err(ConfigError::NonPositivePeriod { .. })
        ));

        let config = StepConfig {
            reset_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            StepScheduler::new(config, RecordingStep::default()),
            Err(ConfigError::InvalidResetThreshold { .. })
        ));
    }

    #[test]
    fn first_tick_takes_the_normal_branch() {
        let mut sched = scheduler(16.0);
        sched.on_tick(5.0, 5.0).unwrap();

        assert_eq!(sched.step_fn().calls, vec![(16.0, 5.0, StepKind::Advance)]);
        assert_eq!(sched.clock().last_step_time(), 16.0);
        assert_eq!(sched.clock().correction(), 11.0);
    }

    #[test]
    fn catch_up_burst_matches_backlog() {
        // 100ms of backlog at a 16ms period: six whole periods caught up,
        // then one normal step for the 4ms remainder.
        let mut sched = scheduler(16.0);
        sched.on_tick(100.0, 100.0).unwrap();

        let calls = &sched.step_fn().calls;
        assert_eq!(calls.len(), 7);
        for (i, call) in calls.iter().take(6).enumerate() {
            let boundary = 16.0 * (i + 1) as f64;
            assert_eq!(*call, (boundary, 16.0, StepKind::Advance));
        }
        assert_eq!(calls[6], (112.0, 4.0, StepKind::Advance));

        assert_eq!(sched.clock().last_step_time(), 112.0);
        assert_eq!(sched.clock().correction(), 12.0);
    }

    #[test]
    fn early_tick_reports_elapsed_without_advancing() {
        let mut sched = scheduler(16.0);
        sched.on_tick(20.0, 20.0).unwrap();
        // Boundary is now 32 with correction 12; a tick at 25 is early.
        sched.on_tick(25.0, 5.0).unwrap();

        let calls = &sched.step_fn().calls;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], (25.0, 5.0, StepKind::Provisional));
        assert_eq!(sched.clock().last_step_time(), 32.0);
        assert_eq!(sched.clock().correction(), 7.0);
    }

    #[test]
    fn consecutive_elapsed_times_sum_to_host_elapsed() {
        // Provisional and advancing steps interleave without ever
        // double-counting time.
        let mut sched = scheduler(16.0);
        for &(t, hint) in &[(20.0, 20.0), (25.0, 5.0), (34.0, 9.0), (50.0, 16.0)] {
            sched.on_tick(t, hint).unwrap();
        }

        let total: f64 = sched.step_fn().calls.iter().map(|c| c.1).sum();
        assert_relative_eq!(total, 50.0);
    }

    #[test]
    fn last_step_time_is_monotonic_without_resets() {
        let mut sched = scheduler(16.0);
        let mut previous = sched.clock().last_step_time();
        for &t in &[5.0, 12.0, 30.0, 31.0, 64.0, 64.0, 90.0] {
            sched.on_tick(t, 0.0).unwrap();
            let current = sched.clock().last_step_time();
            assert!(current >= previous, "boundary regressed at t={t}");
            previous = current;
        }
    }

    #[test]
    fn external_reset_recenters_before_stepping() {
        let (mut sched, entries) = traced(10.0);
        sched.on_tick(5.0, 5.0).unwrap();

        let handle = sched.reset_handle();
        handle.raise();
        sched.on_tick(7.0, 2.0).unwrap();

        // Re-centering happened before the step: boundary 2, carry 5,
        // then one normal step of exactly one period.
        assert!(!handle.is_raised());
        let calls = &sched.step_fn().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], (12.0, 10.0, StepKind::Advance));
        assert_eq!(sched.clock().last_step_time(), 12.0);
        assert_eq!(sched.clock().correction(), 5.0);

        let entries = entries.lock().unwrap();
        assert_eq!(
            *entries,
            vec!["step", "resync:ExternalSignal", "step"],
            "resync must be traced before the reset tick's step"
        );
    }

    #[test]
    fn stall_resyncs_instead_of_bursting() {
        // 500ms beyond the boundary would be a 31-step burst; the stall
        // threshold turns it into one resynchronized step instead.
        let (mut sched, entries) = traced(16.0);
        sched.on_tick(500.0, 500.0).unwrap();

        let calls = &sched.step_fn().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (508.0, 16.0, StepKind::Advance));
        assert_eq!(sched.clock().correction(), 8.0);
        assert_eq!(*entries.lock().unwrap(), vec!["resync:Stall", "step"]);
    }

    #[test]
    fn tick_just_inside_threshold_still_bursts() {
        // Gap of period + threshold exactly: not a stall, catch up.
        let (mut sched, entries) = traced(16.0);
        sched.on_tick(116.0, 116.0).unwrap();

        assert!(entries.lock().unwrap().iter().all(|e| e != "resync:Stall"));
        assert!(sched.step_fn().calls.len() > 1);
    }

    #[test]
    fn external_signal_wins_over_stall() {
        let (mut sched, entries) = traced(16.0);
        sched.reset_handle().raise();
        sched.on_tick(1000.0, 1000.0).unwrap();

        assert_eq!(
            *entries.lock().unwrap(),
            vec!["resync:ExternalSignal", "step"]
        );
    }

    #[test]
    fn external_mode_ignores_ticks_and_preserves_pending_reset() {
        let mut sched = scheduler(16.0);
        sched.set_mode(ScheduleMode::External);

        let handle = sched.reset_handle();
        handle.raise();
        sched.on_tick(50.0, 50.0).unwrap();
        sched.on_tick(900.0, 850.0).unwrap();

        // Complete no-op: no steps, clock untouched, flag still pending.
        assert!(sched.step_fn().calls.is_empty());
        assert_eq!(sched.clock().last_step_time(), 0.0);
        assert!(handle.is_raised());

        // The pending reset fires on the first self-scheduled tick.
        sched.set_mode(ScheduleMode::SelfScheduled);
        sched.on_tick(1000.0, 100.0).unwrap();
        assert!(!handle.is_raised());
        assert_eq!(sched.step_fn().calls, vec![(1008.0, 16.0, StepKind::Advance)]);
    }

    #[test]
    fn time_reversal_is_reported_and_survived() {
        let (mut sched, entries) = traced(16.0);
        sched.on_tick(20.0, 20.0).unwrap();
        // Boundary 32, correction 12; host clock jumps back to 10.
        sched.on_tick(10.0, 0.0).unwrap();

        let calls = &sched.step_fn().calls;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], (10.0, 0.0, StepKind::Provisional));
        assert!(calls.iter().all(|c| c.1 >= 0.0));

        let entries = entries.lock().unwrap();
        assert!(entries
            .iter()
            .any(|e| e.contains("anomaly") && e.contains("previous: 20.0")));
    }

    #[test]
    fn reset_suppresses_the_anomaly_report() {
        let (mut sched, entries) = traced(16.0);
        sched.on_tick(20.0, 20.0).unwrap();
        sched.reset_handle().raise();
        sched.on_tick(10.0, 0.0).unwrap();

        assert!(entries.lock().unwrap().iter().all(|e| !e.contains("anomaly")));
    }

    #[test]
    fn step_failure_stops_the_burst_and_propagates() {
        let mut sched = scheduler(16.0);
        sched.step_fn_mut().fail_at = Some(3);

        let err = sched.on_tick(100.0, 100.0).unwrap_err();
        assert!(err.to_string().contains("injected step failure"));

        // The burst stopped at the failing call; the boundary stays at
        // the last completed absorption so a surviving caller resumes
        // from there.
        assert_eq!(sched.step_fn().calls.len(), 3);
        assert_eq!(sched.clock().last_step_time(), 48.0);
        assert_eq!(sched.clock().correction(), 0.0);
    }

    #[test]
    fn events_are_published_for_resync_and_burst() {
        let bus = EventBus::new();
        let config = StepConfig {
            period: 16.0,
            ..Default::default()
        };
        let mut sched = StepScheduler::new(config, RecordingStep::default())
            .expect("Config should be valid")
            .with_event_sender(bus.sender());

        sched.on_tick(500.0, 500.0).unwrap();
        sched.on_tick(600.0, 100.0).unwrap();

        let events: Vec<SchedulerEvent> = bus.receiver().drain().collect();
        assert_eq!(
            events,
            vec![
                SchedulerEvent::Resynchronized {
                    cause: ResyncCause::Stall,
                    t: 500.0
                },
                SchedulerEvent::CatchUpBurst { steps: 5, t: 600.0 },
            ]
        );
    }

    #[test]
    fn lifecycle_passthrough_forwards_and_publishes() {
        struct SharedHooks {
            seen: Arc<Mutex<Vec<String>>>,
        }

        impl WorldHooks for SharedHooks {
            fn object_added(&mut self, id: ObjectId) {
                self.seen.lock().unwrap().push(format!("add:{}", id.0));
            }

            fn object_removed(&mut self, id: ObjectId) {
                self.seen.lock().unwrap().push(format!("remove:{}", id.0));
            }

            fn slow_frame_rate(&mut self) {
                self.seen.lock().unwrap().push("slow".to_string());
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::new();
        let mut sched = scheduler(16.0)
            .with_hooks(Box::new(SharedHooks {
                seen: Arc::clone(&seen),
            }))
            .with_event_sender(bus.sender());

        sched.add_object(ObjectId(7));
        sched.note_slow_frame_rate();
        sched.remove_object(ObjectId(7));

        assert_eq!(*seen.lock().unwrap(), vec!["add:7", "slow", "remove:7"]);
        let events: Vec<SchedulerEvent> = bus.receiver().drain().collect();
        assert_eq!(
            events,
            vec![
                SchedulerEvent::ObjectAdded { id: ObjectId(7) },
                SchedulerEvent::SlowFrameRate,
                SchedulerEvent::ObjectRemoved { id: ObjectId(7) },
            ]
        );

        // Lifecycle notifications never touch the clock.
        assert_eq!(sched.clock().last_step_time(), 0.0);
        assert_eq!(sched.step_fn().calls.len(), 0);
    }

    #[test]
    fn dropped_receiver_does_not_break_the_tick() {
        let bus = EventBus::new();
        let sender = bus.sender();
        drop(bus);

        let config = StepConfig {
            period: 16.0,
            ..Default::default()
        };
        let mut sched = StepScheduler::new(config, RecordingStep::default())
            .expect("Config should be valid")
            .with_event_sender(sender);

        // Publication failure is logged, never surfaced.
        sched.on_tick(500.0, 500.0).unwrap();
        assert_eq!(sched.step_fn().calls.len(), 1);
    }
}
