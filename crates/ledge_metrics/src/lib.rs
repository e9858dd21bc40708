//! Ledge Metrics - step timing and counters for the simulation loop
//!
//! Everything here compiles down to empty stubs unless the `metrics`
//! feature is on, so instrumented call sites cost nothing in shipping
//! builds.
//!
//! # Usage
//!
//! ```ignore
//! use ledge_metrics::{Counters, FrameTimer, SystemProfiler};
//!
//! let mut timer = FrameTimer::new(120);
//! let mut profiler = SystemProfiler::new();
//! timer.begin();
//! profiler.time_system("step", || sim.step(&input));
//! timer.end();
//! tracing::info!(avg_ms = timer.frame_time_ms(), "frame");
//! ```
//!
//! The `metrics!` and `time_scope!` macros check the *calling* crate's
//! `metrics` feature, so a crate using them should forward its own
//! `metrics` feature to `ledge_metrics/metrics`.

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod system_profiler;

#[cfg(feature = "metrics")]
pub use counter::Counters;
#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use system_profiler::SystemProfiler;

/// Whether this build collects metrics.
pub const ENABLED: bool = cfg!(feature = "metrics");

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

/// Time a block under `name` (just runs the block when metrics are off)
#[macro_export]
macro_rules! time_scope {
    ($profiler:expr, $name:expr, $body:block) => {{
        #[cfg(feature = "metrics")]
        let result = $profiler.time_system($name, || $body);
        #[cfg(not(feature = "metrics"))]
        let result = $body;
        result
    }};
}

// No-op stand-ins with the same surface as the real types.

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_window: usize) -> Self {
        Self
    }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) -> std::time::Duration {
        std::time::Duration::ZERO
    }
    pub fn frames(&self) -> u64 {
        0
    }
    pub fn steps_per_sec(&self) -> f64 {
        0.0
    }
    pub fn frame_time_ms(&self) -> f64 {
        0.0
    }
    pub fn last_frame_ms(&self) -> f64 {
        0.0
    }
    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug)]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self {
        Self(std::marker::PhantomData)
    }
    pub fn push(&mut self, _sample: T) {}
    pub fn len(&self) -> usize {
        0
    }
    pub fn is_empty(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct Counters;

#[cfg(not(feature = "metrics"))]
impl Counters {
    pub fn new() -> Self {
        Self
    }
    pub fn add(&mut self, _name: &'static str, _amount: u64) {}
    pub fn set(&mut self, _name: &'static str, _value: u64) {}
    pub fn get(&self, _name: &'static str) -> u64 {
        0
    }
    pub fn clear(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct SystemProfiler;

#[cfg(not(feature = "metrics"))]
impl SystemProfiler {
    pub fn new() -> Self {
        Self
    }
    pub fn time_system<F, R>(&mut self, _name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        f()
    }
    pub fn get_timing(&self, _name: &'static str) -> std::time::Duration {
        std::time::Duration::ZERO
    }
    pub fn reset(&mut self) {}
}
