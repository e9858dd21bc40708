//! Ledge Engine Core
//!
//! Contains the run-time core of the side-scroller:
//! - Stable entity handles and the handle index
//! - Draw-order sorted entity storage
//! - Swept AABB collision and sub-stepped motion
//! - The simulation context that runs one frame

pub mod config;
pub mod entity;
pub mod error;
pub mod math;
pub mod physics;
pub mod sim;
pub mod time;

pub use glam;

pub use config::SimConfig;
pub use entity::{DrawOrder, Entity, EntityFlags, EntityKind, EntityStore, Handle, HandleIndex};
pub use error::{CoreError, Resource};
pub use physics::{
    CollisionQuery, CollisionResponse, CollisionRules, HitAxis, MotionIntegrator, MoveOutcome,
    PatrolOutcome,
};
pub use sim::{FrameInput, Simulation, StepReport};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
