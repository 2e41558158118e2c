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

use approx::assert_relative_eq;
use std::thread;
use takt_core::diagnostics::ResyncCause;
use takt_core::event::{EventBus, SchedulerEvent};
use takt_core::step::{StepFunction, StepKind};
use takt_core::{StepConfig, StepScheduler};

/// A toy simulation: constant velocity of 1 unit per millisecond, so the
/// travelled distance equals the total elapsed time handed out by the
/// scheduler.
#[derive(Default)]
struct Integrator {
    position: f64,
    advances: u32,
    provisionals: u32,
}

impl StepFunction for Integrator {
    fn step(&mut self, _time: f64, dt: f64, kind: StepKind) -> anyhow::Result<()> {
        assert!(dt >= 0.0, "scheduler handed out a negative dt: {dt}");
        self.position += dt;
        match kind {
            StepKind::Advance => self.advances += 1,
            StepKind::Provisional => self.provisionals += 1,
        }
        Ok(())
    }
}

fn scheduler_with_bus(period: f64) -> (StepScheduler<Integrator>, EventBus<SchedulerEvent>) {
    let bus = EventBus::new();
    let config = StepConfig {
        period,
        ..Default::default()
    };
    let sched = StepScheduler::new(config, Integrator::default())
        .expect("Config should be valid")
        .with_event_sender(bus.sender());
    (sched, bus)
}

#[test]
fn test_tick_stream_with_stall_and_external_reset() {
    let (mut sched, bus) = scheduler_with_bus(20.0);

    // Locked cadence: ticks exactly on the 20ms beat.
    for t in [20.0, 40.0, 60.0, 80.0, 100.0] {
        sched.on_tick(t, 20.0).unwrap();
    }
    assert_eq!(sched.step_fn().advances, 5);
    assert_relative_eq!(sched.step_fn().position, 100.0);

    // A 200ms gap exceeds period + threshold: resynchronize, no burst.
    sched.on_tick(300.0, 200.0).unwrap();
    assert_eq!(sched.step_fn().advances, 6);

    // External reset raised from another thread, consumed by the next
    // tick.
    let handle = sched.reset_handle();
    let raiser = thread::spawn(move || handle.raise());
    raiser.join().expect("Thread join failed");
    sched.on_tick(310.0, 10.0).unwrap();
    assert_eq!(sched.step_fn().advances, 7);

    // An early tick after the reset produces one provisional step.
    sched.on_tick(315.0, 5.0).unwrap();
    assert_eq!(sched.step_fn().provisionals, 1);
    assert_relative_eq!(sched.clock().last_step_time(), 320.0);
    assert_relative_eq!(sched.clock().correction(), 5.0);

    // Every resynchronized stretch hands out exactly one period per
    // advancing step plus the provisional remainder.
    assert_relative_eq!(sched.step_fn().position, 145.0);

    let events: Vec<SchedulerEvent> = bus.receiver().drain().collect();
    assert_eq!(
        events,
        vec![
            SchedulerEvent::Resynchronized {
                cause: ResyncCause::Stall,
                t: 300.0
            },
            SchedulerEvent::Resynchronized {
                cause: ResyncCause::ExternalSignal,
                t: 310.0
            },
        ]
    );
}

#[test]
fn test_short_pause_is_absorbed_without_losing_time() {
    let (mut sched, bus) = scheduler_with_bus(20.0);

    sched.on_tick(20.0, 20.0).unwrap();
    // A 90ms pause stays inside the threshold: the backlog is absorbed
    // as four whole periods plus one partial step.
    sched.on_tick(110.0, 90.0).unwrap();

    assert_eq!(sched.step_fn().advances, 6);
    assert_eq!(sched.step_fn().provisionals, 0);
    assert_relative_eq!(sched.step_fn().position, 110.0);

    let events: Vec<SchedulerEvent> = bus.receiver().drain().collect();
    assert_eq!(events, vec![SchedulerEvent::CatchUpBurst { steps: 4, t: 110.0 }]);
}

#[test]
fn test_on_beat_ticks_keep_zero_correction() {
    let config = StepConfig::default();
    let period = config.period;
    let mut sched =
        StepScheduler::new(config, Integrator::default()).expect("Config should be valid");

    // Accumulate tick time the same way a host loop does, one period at
    // a time.
    let mut t = 0.0;
    for _ in 0..120 {
        t += period;
        sched.on_tick(t, period).unwrap();
    }

    assert_eq!(sched.step_fn().advances, 120);
    assert_eq!(sched.step_fn().provisionals, 0);
    assert_eq!(sched.clock().correction(), 0.0);
    assert_relative_eq!(sched.step_fn().position, t, epsilon = 1e-6);
}
