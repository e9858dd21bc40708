//! Deterministic time system
//!
//! Fixed 60Hz tick rate; the step length itself comes from `SimConfig::dt`

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;

/// Simulation clock advanced once per `Simulation::step`.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick_count: u64,
    elapsed_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self, dt: f32) {
        self.tick_count += 1;
        self.elapsed_secs += f64::from(dt);
    }

    /// Total simulated seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate_time() {
        let mut clock = SimClock::new();
        for _ in 0..TICK_RATE_HZ {
            clock.advance_tick(1.0 / TICK_RATE_HZ as f32);
        }
        assert_eq!(clock.tick_count(), 60);
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-5);
    }
}
