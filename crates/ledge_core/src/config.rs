//! Simulation settings
//!
//! Every field has a default so partial JSON files load cleanly.

use crate::error::CoreError;
use crate::time::TICK_RATE_HZ;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Core simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum number of live entities.
    pub entity_capacity: usize,
    /// Bucket count of the handle index (bucket 0 is reserved).
    pub index_buckets: usize,
    /// Step length in seconds.
    pub dt: f32,
    pub gravity: Vec2,
    /// Horizontal drag coefficient (1/s).
    pub friction: f32,
    /// Collision-limited partial moves per `move_entity` call.
    pub max_substeps: u32,
    /// Distance in meters kept between a mover and the surface it hit.
    pub backoff: f32,
    /// How far below an entity to look for ground.
    pub ground_probe: f32,
    /// Half-width of the leading-edge probe used by patrol movement.
    pub probe_half_width: f32,
    pub player: PlayerTuning,
    pub patrol: PatrolTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub run_accel: f32,
    pub jump_speed: f32,
    pub laser_speed: f32,
    pub laser_lifetime: f32,
    pub laser_size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolTuning {
    pub speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 4096,
            index_buckets: 1024,
            dt: 1.0 / TICK_RATE_HZ as f32,
            gravity: Vec2::new(0.0, -30.0),
            friction: 8.0,
            max_substeps: 4,
            backoff: 0.001,
            ground_probe: 0.05,
            probe_half_width: 0.01,
            player: PlayerTuning::default(),
            patrol: PatrolTuning::default(),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            run_accel: 60.0,
            jump_speed: 14.0,
            laser_speed: 24.0,
            laser_lifetime: 1.5,
            laser_size: Vec2::new(0.5, 0.125),
        }
    }
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self { speed: 2.0 }
    }
}

impl SimConfig {
    /// Reject settings the store and solver cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fail = |reason: &str| {
            Err(CoreError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.entity_capacity == 0 {
            return fail("entity_capacity must be at least 1");
        }
        if self.index_buckets < 2 {
            return fail("index_buckets must be at least 2 (bucket 0 is reserved)");
        }
        if self.max_substeps == 0 {
            return fail("max_substeps must be at least 1");
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return fail("dt must be a positive finite number of seconds");
        }
        if !(self.backoff >= 0.0) {
            return fail("backoff must not be negative");
        }
        if !(self.ground_probe > self.backoff) {
            return fail("ground_probe must be larger than backoff");
        }
        if !(self.probe_half_width > 0.0) {
            return fail("probe_half_width must be positive");
        }
        if !self.gravity.is_finite() {
            return fail("gravity must be finite");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{ "entity_capacity": 16, "patrol": { "speed": 5.0 } }"#)
                .unwrap();
        assert_eq!(cfg.entity_capacity, 16);
        assert_eq!(cfg.patrol.speed, 5.0);
        assert_eq!(cfg.max_substeps, 4);
        assert_eq!(cfg.player, PlayerTuning::default());
    }

    #[test]
    fn gravity_reads_as_vector() {
        let cfg: SimConfig = serde_json::from_str(r#"{ "gravity": [0.0, -9.8] }"#).unwrap();
        assert_eq!(cfg.gravity, Vec2::new(0.0, -9.8));
    }

    #[test]
    fn rejects_unusable_settings() {
        let mut cfg = SimConfig::default();
        cfg.index_buckets = 1;
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));

        let mut cfg = SimConfig::default();
        cfg.dt = f32::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = SimConfig::default();
        cfg.max_substeps = 0;
        assert!(cfg.validate().is_err());
    }
}
