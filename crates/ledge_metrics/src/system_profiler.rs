//! Accumulated time per named phase of the frame

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct SystemProfiler {
    /// Insertion ordered; a frame has only a handful of phases.
    timings: Vec<(&'static str, Duration)>,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_system<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        match self.timings.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += elapsed,
            None => self.timings.push((name, elapsed)),
        }
    }

    pub fn get_timing(&self, name: &'static str) -> Duration {
        self.timings
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(Duration::ZERO, |&(_, d)| d)
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|&(_, d)| d).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.timings.iter().copied()
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }
}
