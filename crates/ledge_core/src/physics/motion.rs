//! Sub-stepped motion integration
//!
//! A move is split into at most `max_substeps` collision-limited partial
//! moves. Each partial move goes as far as the solver allows, backs off a
//! little from the surface it hit, kills the blocked velocity component and
//! hands the rest of the displacement to the next sub-step.

use super::collision::{sweep, HitAxis};
use super::CollisionRules;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityFlags, EntityStore, Handle};
use crate::math::Vec2;

/// What happened during one `move_entity` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveOutcome {
    /// Sweeps performed.
    pub substeps: u32,
    /// Collisions reported, solid or not.
    pub hits: u32,
    pub hit_solid: bool,
    pub blocked_x: bool,
    pub blocked_y: bool,
    pub last_hit: Option<Handle>,
    /// Fraction of the step's displacement left unresolved when the loop ended.
    pub remaining: f32,
}

/// Result of one patrol step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatrolOutcome {
    pub movement: MoveOutcome,
    /// Facing was flipped at a ledge or a wall.
    pub turned: bool,
    /// The step was undone because it walked off a ledge.
    pub rolled_back: bool,
}

/// Moves entities through the store, resolving collisions as it goes.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    gravity: Vec2,
    friction: f32,
    max_substeps: u32,
    backoff: f32,
    ground_probe: f32,
    probe_half_width: f32,
    /// Non-solid entities already touched during the current move.
    passed: Vec<Handle>,
}

impl MotionIntegrator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction,
            max_substeps: config.max_substeps,
            backoff: config.backoff,
            ground_probe: config.ground_probe,
            probe_half_width: config.probe_half_width,
            passed: Vec::with_capacity(config.max_substeps as usize),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Unit vector along gravity; straight down when gravity is zero.
    fn down(&self) -> Vec2 {
        self.gravity.try_normalize().unwrap_or(Vec2::NEG_Y)
    }

    /// Whether a short sweep along gravity hits something solid.
    pub fn is_grounded(&self, store: &EntityStore, rules: &CollisionRules, entity: &Entity) -> bool {
        let probe = self.down() * self.ground_probe;
        sweep(store, rules, entity, probe, &[]).hit_solid
    }

    /// Advance one entity by `dt` under `acceleration` plus gravity and
    /// friction, resolving collisions. Returns `None` if the handle is dead.
    pub fn move_entity(
        &mut self,
        store: &mut EntityStore,
        rules: &CollisionRules,
        handle: Handle,
        dt: f32,
        acceleration: Vec2,
    ) -> Option<MoveOutcome> {
        let mut entity = *store.by_handle(handle)?;

        let mut accel = acceleration;
        if !entity.has(EntityFlags::IGNORES_GRAVITY) {
            accel += self.gravity;
        }
        if !entity.has(EntityFlags::IGNORES_FRICTION) {
            accel.x -= self.friction * entity.velocity.x;
        }

        let mut delta = entity.velocity * dt + 0.5 * accel * dt * dt;
        let down = self.down();
        let mut outcome = MoveOutcome::default();
        let mut remaining = 1.0_f32;
        entity.flags.remove(EntityFlags::ON_GROUND);
        self.passed.clear();

        while outcome.substeps < self.max_substeps && remaining > 0.0 && delta != Vec2::ZERO {
            outcome.substeps += 1;
            let query = sweep(store, rules, &entity, delta, &self.passed);
            let Some(other) = query.hit else {
                entity.position += delta;
                remaining = 0.0;
                break;
            };

            let advance = (query.t - self.backoff / delta.length()).max(0.0);
            entity.position += delta * advance;
            outcome.hits += 1;
            outcome.last_hit = Some(other);

            // A solid hit consumes the displacement up to contact. A non-solid
            // one is ignored from here on, so the backoff distance is carried.
            let consumed = if query.hit_solid { query.t } else { advance };
            let mut rest = delta * (1.0 - consumed);
            if query.hit_solid {
                outcome.hit_solid = true;
                let blocked = match query.axis {
                    Some(HitAxis::Horizontal) => {
                        entity.velocity.x = 0.0;
                        accel.x = 0.0;
                        rest.x = 0.0;
                        outcome.blocked_x = true;
                        Vec2::new(delta.x, 0.0)
                    }
                    Some(HitAxis::Vertical) => {
                        entity.velocity.y = 0.0;
                        accel.y = 0.0;
                        rest.y = 0.0;
                        outcome.blocked_y = true;
                        Vec2::new(0.0, delta.y)
                    }
                    None => Vec2::ZERO,
                };
                if blocked.dot(down) > 0.0 {
                    entity.flags.insert(EntityFlags::ON_GROUND);
                }
            } else {
                self.passed.push(other);
            }

            if let Some(touched) = store.by_handle_mut(other) {
                rules.response(touched.kind, entity.kind).apply(touched);
                rules.response(entity.kind, touched.kind).apply(&mut entity);
            }

            remaining *= 1.0 - consumed;
            delta = rest;
            if entity.has(EntityFlags::REMOVE) {
                break;
            }
        }

        entity.velocity += accel * dt;
        outcome.remaining = remaining;
        if let Some(slot) = store.by_handle_mut(handle) {
            *slot = entity;
        }
        Some(outcome)
    }

    /// Patrol step: walk at `speed` in the facing direction, turning around
    /// instead of walking off a ledge or into a wall.
    ///
    /// The move runs with the collision box collapsed to a thin probe on the
    /// leading edge, so a ledge is seen one step before the body reaches it.
    pub fn move_horizontally(
        &mut self,
        store: &mut EntityStore,
        rules: &CollisionRules,
        handle: Handle,
        speed: f32,
        dt: f32,
        acceleration: Vec2,
    ) -> Option<PatrolOutcome> {
        let before = *store.by_handle(handle)?;
        let grounded_before = self.is_grounded(store, rules, &before);
        let sign = before.facing_sign();

        {
            let entity = store.by_handle_mut(handle)?;
            entity.velocity.x = speed * sign;
            entity.collision_size.x = self.probe_half_width;
            entity.collision_offset.x = before.collision_offset.x + sign * before.collision_size.x;
        }
        let movement = self
            .move_entity(store, rules, handle, dt, acceleration)
            .unwrap_or_default();
        let probe = *store.by_handle(handle)?;
        let grounded_after = self.is_grounded(store, rules, &probe);

        let entity = store.by_handle_mut(handle)?;
        entity.collision_size = before.collision_size;
        entity.collision_offset = before.collision_offset;

        let mut outcome = PatrolOutcome {
            movement,
            ..PatrolOutcome::default()
        };
        if grounded_before && !grounded_after {
            entity.position = before.position;
            entity.velocity = before.velocity;
            entity
                .flags
                .set(EntityFlags::ON_GROUND, before.has(EntityFlags::ON_GROUND));
            entity.flags.toggle(EntityFlags::FACES_LEFT);
            outcome.turned = true;
            outcome.rolled_back = true;
        } else if movement.blocked_x && entity.facing_sign() == sign {
            // A collision response may already have turned it around.
            entity.flags.toggle(EntityFlags::FACES_LEFT);
            outcome.turned = true;
        }
        Some(outcome)
    }
}
