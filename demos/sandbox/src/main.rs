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

// Takt Sandbox
// Drives the step scheduler from a real, deliberately jittery host loop:
// irregular sleeps, one long stall, and an external reset raised from a
// second thread.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use takt_core::hooks::ObjectId;
use takt_core::step::{StepFunction, StepKind};
use takt_core::{StepConfig, StepScheduler};
use takt_telemetry::{CadenceMonitor, FanoutSink, LogSink, StatsSink};

/// Toy fixed-step simulation: a ball dropped from two meters, bouncing
/// with damped rebounds. Runs entirely on the elapsed time the scheduler
/// hands out.
struct BouncingBall {
    height: f64,
    velocity: f64,
    bounces: u32,
}

impl BouncingBall {
    fn new() -> Self {
        Self {
            height: 2.0,
            velocity: 0.0,
            bounces: 0,
        }
    }
}

impl StepFunction for BouncingBall {
    fn step(&mut self, _time: f64, dt: f64, _kind: StepKind) -> Result<()> {
        let dt_s = dt / 1000.0;
        self.velocity -= 9.81 * dt_s;
        self.height += self.velocity * dt_s;
        if self.height < 0.0 {
            self.height = -self.height;
            self.velocity = -self.velocity * 0.8;
            self.bounces += 1;
            log::debug!(
                "Bounce {} at velocity {:.2} m/s",
                self.bounces,
                self.velocity
            );
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = StepConfig::default();
    log::info!(
        "Starting sandbox: period={:.2}ms threshold={:.0}ms",
        config.period,
        config.reset_threshold
    );

    let stats = StatsSink::new();
    let stats_handle = stats.handle();
    let sink = FanoutSink::new()
        .with(Box::new(LogSink::new()))
        .with(Box::new(stats));

    let bus = takt_core::event::EventBus::new();
    let mut scheduler = StepScheduler::new(config, BouncingBall::new())?
        .with_diagnostics(Box::new(sink))
        .with_event_sender(bus.sender());

    scheduler.add_object(ObjectId(1));

    // A second thread asks for a resynchronization mid-run.
    let reset = scheduler.reset_handle();
    let raiser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1200));
        log::info!("Raising external reset");
        reset.raise();
    });

    let mut monitor = CadenceMonitor::new(scheduler.period());
    let mut stalled = false;

    let start = Instant::now();
    let mut previous_t = 0.0;
    let mut iteration: u64 = 0;

    loop {
        let t = start.elapsed().as_secs_f64() * 1000.0;
        if t >= 3000.0 {
            break;
        }

        scheduler.on_tick(t, t - previous_t)?;
        previous_t = t;

        monitor.observe(t);
        if monitor.just_degraded() {
            scheduler.note_slow_frame_rate();
        }

        for event in bus.receiver().try_iter() {
            log::info!("Event: {event:?}");
        }

        // One long stall halfway through the run.
        if !stalled && t > 1800.0 {
            log::info!("Simulating a 400ms stall");
            thread::sleep(Duration::from_millis(400));
            stalled = true;
            continue;
        }

        // Jittery host cadence between 12 and 24ms.
        thread::sleep(Duration::from_millis(12 + (iteration % 5) * 3));
        iteration += 1;
    }

    raiser.join().expect("Reset thread panicked");
    scheduler.remove_object(ObjectId(1));
    for event in bus.receiver().try_iter() {
        log::info!("Event: {event:?}");
    }

    let ball = scheduler.step_fn();
    log::info!(
        "Run complete: {} bounces, height {:.2}m, velocity {:.2} m/s",
        ball.bounces,
        ball.height,
        ball.velocity
    );

    let report = stats_handle.snapshot();
    log::info!(
        "Steps: {} normal, {} catch-up, {} provisional ({} total)",
        report.normal_steps,
        report.catch_up_steps,
        report.provisional_steps,
        report.total_steps()
    );
    log::info!(
        "Resyncs: {} external, {} stall; peak correction {:.2}ms, catch-up share {:.1}%",
        report.external_resyncs,
        report.stall_resyncs,
        report.peak_correction,
        report.catch_up_share() * 100.0
    );

    Ok(())
}
