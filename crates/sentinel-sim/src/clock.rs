//! Simulation clock — the single periodic driver.
//!
//! Runs the simulation at a fixed frame rate with a speed multiplier that
//! scales the delta fed to physics (the tick cadence itself is constant).
//! `next_step` scrubs exactly one frame synchronously without starting
//! periodic ticking. The paced `run` loop delivers render-ready events to
//! a sink only after each frame returns, so heavy render work never
//! blocks the next tick.

use std::time::{Duration, Instant};

use sentinel_core::events::TickEvent;

use crate::engine::{SimConfig, Simulation};

/// Consumer of per-tick render notifications.
pub trait RenderSink {
    /// Called once per tick, after physics and detection for that tick
    /// have completed. `dt` is the speed-scaled delta the tick advanced by.
    fn render_ready(&mut self, dt: f32);
}

/// Periodic driver for a `Simulation`.
pub struct SimulationClock {
    frame_rate: u32,
    speed: f32,
    running: bool,
    last_tick: Option<Instant>,
}

impl SimulationClock {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            frame_rate: config.frame_rate.max(1),
            speed: config.time_scale.max(0.0),
            running: false,
            last_tick: None,
        }
    }

    /// Nominal duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.frame_rate))
    }

    /// Nominal delta of one tick at 1x speed, in seconds.
    fn nominal_dt(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Begin ticking: resets the elapsed-time baseline so the first frame
    /// after a pause is not charged for the paused wall time.
    pub fn start(&mut self) {
        self.running = true;
        self.last_tick = None;
    }

    /// Halt ticking. Never interrupts a frame already in progress.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set the speed multiplier. Non-positive values are a caller error;
    /// they are clamped to zero (paused time) with a warning.
    pub fn set_speed(&mut self, multiplier: f32) {
        if multiplier < 0.0 {
            log::warn!("set_speed: clamping negative multiplier {multiplier} to 0");
            self.speed = 0.0;
        } else {
            self.speed = multiplier;
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Perform exactly one frame synchronously, from either state, using
    /// the nominal tick delta. Does not start periodic ticking.
    pub fn next_step(&mut self, sim: &mut Simulation) {
        sim.step_frame(self.nominal_dt() * self.speed);
    }

    /// One periodic tick: wall-clock delta since the last tick, scaled by
    /// the speed multiplier, fed to the simulation. The render-ready
    /// event for this tick is queued inside `step_frame`; it becomes
    /// observable only when the host drains it after this call returns.
    pub fn frame(&mut self, sim: &mut Simulation) {
        let now = Instant::now();
        let delta = match self.last_tick {
            Some(previous) => (now - previous).as_secs_f32(),
            None => self.nominal_dt(),
        };
        self.last_tick = Some(now);
        sim.step_frame(delta * self.speed);
    }

    /// Blocking pacing loop: tick at `1000/frame_rate` ms, draining
    /// render events to `sink` after each frame. Runs until `stop()` has
    /// been observed or `max_ticks` frames have completed.
    pub fn run(
        &mut self,
        sim: &mut Simulation,
        sink: &mut dyn RenderSink,
        max_ticks: Option<u64>,
    ) {
        self.start();
        let mut ticks = 0u64;
        let mut next_tick_time = Instant::now();

        while self.running {
            self.frame(sim);
            for event in sim.drain_events() {
                match event {
                    TickEvent::RenderReady { dt } => sink.render_ready(dt),
                }
            }

            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                self.stop();
                break;
            }

            let tick_duration = self.tick_duration();
            next_tick_time += tick_duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick_duration * 2 {
                // Too far behind — reset to avoid a catch-up spiral.
                next_tick_time = now;
            }
        }
    }
}
