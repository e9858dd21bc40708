//! Collision detection and response.
//!
//! `collision` answers "how far can this entity get"; `motion` turns that
//! answer into position and velocity changes; `rules` decides which kinds
//! interact and what they do to each other.

mod collision;
mod motion;
mod rules;

pub use collision::{sweep, CollisionQuery, HitAxis};
pub use motion::{MotionIntegrator, MoveOutcome, PatrolOutcome};
pub use rules::{CollisionResponse, CollisionRules};
