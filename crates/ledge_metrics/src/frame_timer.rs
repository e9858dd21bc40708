//! Wall-clock cost of each simulation step

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct FrameTimer {
    started: Instant,
    samples: RingBuffer<Duration>,
    frames: u64,
}

impl FrameTimer {
    /// Keep a rolling window of the last `window` frames.
    pub fn new(window: usize) -> Self {
        Self {
            started: Instant::now(),
            samples: RingBuffer::new(window),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.started = Instant::now();
    }

    /// Close the frame opened by `begin` and return its duration.
    pub fn end(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        self.samples.push(elapsed);
        self.frames += 1;
        elapsed
    }

    /// Frames recorded since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Steps per second the loop could sustain at the current average cost.
    pub fn steps_per_sec(&self) -> f64 {
        let avg = self.samples.average().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.samples.average().as_secs_f64() * 1000.0
    }

    /// Duration of the most recent frame.
    pub fn last_frame_ms(&self) -> f64 {
        self.samples
            .latest()
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.samples.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(60)
    }
}
