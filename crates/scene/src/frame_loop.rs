//! Frame scheduling and the tick loop.
//!
//! A [`FrameScheduler`] hands out frame timestamps (time since start-up).
//! [`run`] asks for the next one only after the previous tick finished, so
//! ticks never overlap.

use crate::scene::{InputEvent, Scene};
use glyph_dust_core::DustError;
use std::time::{Duration, Instant};

/// Roughly one display refresh at 60 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub trait FrameScheduler {
    /// Blocks until the next frame is due and returns its timestamp, or
    /// `None` when the loop should stop.
    fn next_frame(&mut self) -> Option<Duration>;
}

/// Headless scheduler: timestamps advance by a fixed step without sleeping.
#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: Duration,
    next: Duration,
    remaining: u64,
}

impl FixedStep {
    /// Stops after `count` frames.
    pub fn frames(interval: Duration, count: u64) -> Self {
        Self {
            interval,
            next: Duration::ZERO,
            remaining: count,
        }
    }
}

impl FrameScheduler for FixedStep {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = self.next;
        self.next = self.next.saturating_add(self.interval);
        Some(now)
    }
}

/// Wall-clock scheduler sleeping to a fixed cadence. A late frame pushes the
/// schedule back instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct Realtime {
    start: Instant,
    interval: Duration,
    next: Instant,
    remaining: Option<u64>,
}

impl Realtime {
    pub fn new(interval: Duration, frames: Option<u64>) -> Self {
        let start = Instant::now();
        Self {
            start,
            interval,
            next: start,
            remaining: frames,
        }
    }
}

impl FrameScheduler for Realtime {
    fn next_frame(&mut self) -> Option<Duration> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        let at = Instant::now();
        self.next += self.interval;
        if self.next < at {
            self.next = at + self.interval;
        }
        Some(at - self.start)
    }
}

/// Supplies the input events to apply before each frame.
pub trait InputSource {
    fn poll(&mut self, frame: u64, now: Duration) -> Vec<InputEvent>;
}

impl<F> InputSource for F
where
    F: FnMut(u64, Duration) -> Vec<InputEvent>,
{
    fn poll(&mut self, frame: u64, now: Duration) -> Vec<InputEvent> {
        self(frame, now)
    }
}

/// Ticks `scene` once per scheduled frame, applying polled input first.
/// Returns the number of frames run.
pub fn run<S, I>(scene: &mut Scene, scheduler: &mut S, input: &mut I) -> Result<u64, DustError>
where
    S: FrameScheduler + ?Sized,
    I: InputSource + ?Sized,
{
    let mut frame = 0;
    while let Some(now) = scheduler.next_frame() {
        for event in input.poll(frame, now) {
            scene.handle(event, now)?;
        }
        scene.tick(now)?;
        frame += 1;
    }
    Ok(frame)
}
