//! Simulation context
//!
//! Owns everything one frame touches: the entity store (and through it the
//! handle index), the collision rules, the motion integrator and the clock.
//! There is no global state; callers hold a `Simulation` and step it.

use crate::config::SimConfig;
use crate::entity::{DrawOrder, EntityFlags, EntityKind, EntityStore, Handle};
use crate::error::CoreError;
use crate::math::Vec2;
use crate::physics::{CollisionRules, MotionIntegrator, MoveOutcome};
use crate::time::SimClock;

/// Player intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// -1..=1, left to right.
    pub move_x: f32,
    pub jump: bool,
    pub fire: bool,
}

/// Counts gathered during one `Simulation::step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub moved: u32,
    pub substeps: u32,
    pub hits: u32,
    pub turns: u32,
    pub spawned: u32,
    pub removed: u32,
}

impl StepReport {
    fn record(&mut self, outcome: &MoveOutcome) {
        self.moved += 1;
        self.substeps += outcome.substeps;
        self.hits += outcome.hits;
    }
}

pub struct Simulation {
    config: SimConfig,
    store: EntityStore,
    rules: CollisionRules,
    motion: MotionIntegrator,
    clock: SimClock,
}

impl Simulation {
    pub fn new(config: SimConfig, rules: CollisionRules) -> Result<Self, CoreError> {
        config.validate()?;
        tracing::debug!(
            capacity = config.entity_capacity,
            buckets = config.index_buckets,
            dt = config.dt,
            "simulation created"
        );
        Ok(Self {
            store: EntityStore::new(config.entity_capacity, config.index_buckets),
            motion: MotionIntegrator::new(&config),
            rules,
            clock: SimClock::new(),
            config,
        })
    }

    /// Spawn at the kind's default draw order.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        render_size: Vec2,
    ) -> Result<Handle, CoreError> {
        self.store
            .add(kind, kind.default_draw_order(), position, render_size)
    }

    pub fn spawn_with_order(
        &mut self,
        kind: EntityKind,
        draw_order: DrawOrder,
        position: Vec2,
        render_size: Vec2,
    ) -> Result<Handle, CoreError> {
        self.store.add(kind, draw_order, position, render_size)
    }

    /// Run one frame: update every entity, then drop the ones flagged for
    /// removal.
    ///
    /// Entities are visited in draw order as it stood when the frame began.
    /// An entity later in that order sees the already-updated positions of
    /// earlier ones, while earlier entities saw later ones where they were
    /// last frame. Entities spawned during the frame are first updated on
    /// the next one.
    ///
    /// A failed spawn does not cut the frame short: every entity still
    /// moves, flagged entities are dropped and the clock ticks before the
    /// first error is returned.
    pub fn step(&mut self, input: &FrameInput) -> Result<StepReport, CoreError> {
        let dt = self.config.dt;
        let mut report = StepReport::default();
        let mut failure = None;

        for handle in self.store.handles() {
            let Some(entity) = self.store.by_handle(handle) else {
                continue;
            };
            let kind = entity.kind;
            if kind.is_static() || entity.has(EntityFlags::REMOVE) {
                continue;
            }
            match kind {
                EntityKind::Player => {
                    if let Err(err) = self.update_player(handle, input, dt, &mut report) {
                        failure.get_or_insert(err);
                    }
                }
                EntityKind::Patroller => {
                    let speed = self.config.patrol.speed;
                    if let Some(patrol) = self.motion.move_horizontally(
                        &mut self.store,
                        &self.rules,
                        handle,
                        speed,
                        dt,
                        Vec2::ZERO,
                    ) {
                        report.record(&patrol.movement);
                        report.turns += u32::from(patrol.turned);
                    }
                }
                EntityKind::Laser => self.update_laser(handle, dt, &mut report),
                EntityKind::Tile | EntityKind::Spikes | EntityKind::Pickup => {}
            }
        }

        report.removed = self.store.remove_flagged() as u32;
        self.clock.advance_tick(dt);
        report.tick = self.clock.tick_count();
        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    fn update_player(
        &mut self,
        handle: Handle,
        input: &FrameInput,
        dt: f32,
        report: &mut StepReport,
    ) -> Result<(), CoreError> {
        let tuning = self.config.player.clone();
        let grounded = {
            let Some(player) = self.store.by_handle(handle) else {
                return Ok(());
            };
            self.motion.is_grounded(&self.store, &self.rules, player)
        };

        let move_x = input.move_x.clamp(-1.0, 1.0);
        if let Some(player) = self.store.by_handle_mut(handle) {
            if move_x != 0.0 {
                player.flags.set(EntityFlags::FACES_LEFT, move_x < 0.0);
            }
            if input.jump && grounded {
                player.velocity.y = tuning.jump_speed;
            }
        }

        let accel = Vec2::new(move_x * tuning.run_accel, 0.0);
        if let Some(outcome) = self
            .motion
            .move_entity(&mut self.store, &self.rules, handle, dt, accel)
        {
            report.record(&outcome);
        }

        if input.fire {
            if let Some(player) = self.store.by_handle(handle).copied() {
                let sign = player.facing_sign();
                let body = player.collision_box();
                let muzzle = body.center
                    + Vec2::new(sign * (body.half.x + tuning.laser_size.x * 0.5), 0.0);
                let laser = self.spawn(EntityKind::Laser, muzzle, tuning.laser_size)?;
                if let Some(l) = self.store.by_handle_mut(laser) {
                    l.velocity = Vec2::new(sign * tuning.laser_speed, 0.0);
                    l.lifetime = Some(tuning.laser_lifetime);
                    l.flags.set(EntityFlags::FACES_LEFT, sign < 0.0);
                }
                report.spawned += 1;
            }
        }
        Ok(())
    }

    fn update_laser(&mut self, handle: Handle, dt: f32, report: &mut StepReport) {
        if let Some(outcome) =
            self.motion
                .move_entity(&mut self.store, &self.rules, handle, dt, Vec2::ZERO)
        {
            report.record(&outcome);
        }
        if let Some(laser) = self.store.by_handle_mut(handle) {
            if let Some(left) = laser.lifetime.as_mut() {
                *left -= dt;
                if *left <= 0.0 {
                    laser.mark_for_removal();
                }
            }
        }
    }

    /// Change gravity for subsequent steps.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
        self.motion.set_gravity(gravity);
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn rules(&self) -> &CollisionRules {
        &self.rules
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Resource;

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default(), CollisionRules::default()).unwrap()
    }

    /// Floor whose top surface sits at y = 0.
    fn floor(sim: &mut Simulation, center_x: f32, width: f32) -> Handle {
        sim.spawn(
            EntityKind::Tile,
            Vec2::new(center_x, -0.5),
            Vec2::new(width, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig {
            entity_capacity: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config, CollisionRules::default()),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn player_lands_and_stays_on_the_floor() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 20.0);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 3.0), Vec2::ONE)
            .unwrap();

        for _ in 0..120 {
            sim.step(&FrameInput::default()).unwrap();
        }
        let p = sim.store().by_handle(player).unwrap();
        assert!(p.has(EntityFlags::ON_GROUND));
        assert!(p.position.y >= 0.5 && p.position.y < 0.51, "{}", p.position.y);
        assert_eq!(p.velocity.y, 0.0);
        assert_eq!(sim.clock().tick_count(), 120);
    }

    #[test]
    fn player_runs_jumps_and_faces_input() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 40.0);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();

        let run_left = FrameInput {
            move_x: -1.0,
            ..FrameInput::default()
        };
        for _ in 0..30 {
            sim.step(&run_left).unwrap();
        }
        let p = *sim.store().by_handle(player).unwrap();
        assert!(p.position.x < -0.5);
        assert!(p.has(EntityFlags::FACES_LEFT));

        sim.step(&FrameInput {
            jump: true,
            ..FrameInput::default()
        })
        .unwrap();
        let p = sim.store().by_handle(player).unwrap();
        assert!(p.velocity.y > 0.0);
        assert!(p.position.y > 0.5);
        assert!(!p.has(EntityFlags::ON_GROUND));
    }

    #[test]
    fn lasers_fly_and_expire() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 200.0);
        sim.spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();

        let report = sim
            .step(&FrameInput {
                fire: true,
                ..FrameInput::default()
            })
            .unwrap();
        assert_eq!(report.spawned, 1);
        let laser = sim
            .store()
            .iter()
            .find(|e| e.kind == EntityKind::Laser)
            .map(|e| e.handle())
            .unwrap();
        let start_x = sim.store().by_handle(laser).unwrap().position.x;

        sim.step(&FrameInput::default()).unwrap();
        assert!(sim.store().by_handle(laser).unwrap().position.x > start_x);

        let lifetime = sim.config().player.laser_lifetime;
        let frames = (lifetime / sim.config().dt).ceil() as usize + 1;
        for _ in 0..frames {
            sim.step(&FrameInput::default()).unwrap();
        }
        assert!(sim.store().by_handle(laser).is_none());
    }

    #[test]
    fn lasers_are_removed_by_walls() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 40.0);
        sim.spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();
        let wall = sim
            .spawn(EntityKind::Tile, Vec2::new(3.0, 1.0), Vec2::new(1.0, 2.0))
            .unwrap();

        sim.step(&FrameInput {
            fire: true,
            ..FrameInput::default()
        })
        .unwrap();
        let mut removed = 0;
        for _ in 0..10 {
            removed += sim.step(&FrameInput::default()).unwrap().removed;
        }
        assert_eq!(removed, 1);
        assert!(sim.store().iter().all(|e| e.kind != EntityKind::Laser));
        assert!(sim.store().contains(wall));
    }

    #[test]
    fn pickups_vanish_when_touched() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 40.0);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();
        let coin = sim
            .spawn(EntityKind::Pickup, Vec2::new(2.0, 0.5), Vec2::splat(0.5))
            .unwrap();

        let run_right = FrameInput {
            move_x: 1.0,
            ..FrameInput::default()
        };
        for _ in 0..60 {
            sim.step(&run_right).unwrap();
        }
        assert!(sim.store().by_handle(coin).is_none());
        assert!(sim.store().by_handle(player).unwrap().position.x > 2.0);
    }

    #[test]
    fn spikes_kill_the_player() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 40.0);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();
        sim.spawn(EntityKind::Spikes, Vec2::new(2.0, 0.25), Vec2::new(1.0, 0.5))
            .unwrap();

        let run_right = FrameInput {
            move_x: 1.0,
            ..FrameInput::default()
        };
        for _ in 0..60 {
            sim.step(&run_right).unwrap();
        }
        assert!(sim.store().by_handle(player).is_none());
    }

    #[test]
    fn patrollers_stay_on_their_platform() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 4.0);
        let guard = sim
            .spawn(EntityKind::Patroller, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();

        let mut turns = 0;
        for _ in 0..600 {
            turns += sim.step(&FrameInput::default()).unwrap().turns;
            let g = sim.store().by_handle(guard).unwrap();
            assert!(g.position.x.abs() <= 2.0, "{}", g.position.x);
            assert!(g.position.y > 0.49);
        }
        assert!(turns >= 2);
    }

    #[test]
    fn handles_survive_compaction_across_frames() {
        let mut sim = sim();
        floor(&mut sim, 0.0, 40.0);
        let coins: Vec<_> = (0..4)
            .map(|i| {
                sim.spawn(
                    EntityKind::Pickup,
                    Vec2::new(2.0 + i as f32 * 3.0, 0.5),
                    Vec2::splat(0.5),
                )
                .unwrap()
            })
            .collect();
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();

        let run_right = FrameInput {
            move_x: 1.0,
            ..FrameInput::default()
        };
        let mut frames = 0;
        while sim.store().by_handle(coins[0]).is_some() && frames < 120 {
            sim.step(&run_right).unwrap();
            frames += 1;
        }
        assert!(sim.store().by_handle(coins[0]).is_none());
        for &coin in &coins[2..] {
            assert_eq!(sim.store().by_handle(coin).unwrap().handle(), coin);
        }
        assert_eq!(sim.store().by_handle(player).unwrap().kind, EntityKind::Player);
    }

    #[test]
    fn firing_into_a_full_store_still_finishes_the_frame() {
        let config = SimConfig {
            entity_capacity: 4,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config, CollisionRules::default()).unwrap();
        floor(&mut sim, 0.0, 20.0);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 0.5), Vec2::ONE)
            .unwrap();
        let coin = sim
            .spawn(EntityKind::Pickup, Vec2::new(1.0, 0.5), Vec2::splat(0.5))
            .unwrap();
        // Drawn after the player, so it is updated after the failed spawn.
        let laser = sim
            .spawn(EntityKind::Laser, Vec2::new(-5.0, 3.0), Vec2::new(0.5, 0.125))
            .unwrap();
        sim.store_mut().by_handle_mut(player).unwrap().velocity = Vec2::new(30.0, 0.0);
        let l = sim.store_mut().by_handle_mut(laser).unwrap();
        l.velocity = Vec2::new(24.0, 0.0);
        l.lifetime = Some(10.0);

        let fire = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        let err = sim.step(&fire).unwrap_err();
        assert!(matches!(
            err,
            CoreError::CapacityExceeded {
                resource: Resource::EntityStore,
                ..
            }
        ));

        assert_eq!(sim.clock().tick_count(), 1);
        assert!(sim.store().by_handle(coin).is_none());
        assert_eq!(sim.store().len(), 3);
        assert!(sim.store().by_handle(player).unwrap().position.x > 0.25);
        assert!(sim.store().by_handle(laser).unwrap().position.x > -5.0);

        // The pickup's slot is free again.
        let report = sim.step(&fire).unwrap();
        assert_eq!(report.spawned, 1);
        assert_eq!(report.tick, 2);
    }

    #[test]
    fn zero_gravity_leaves_floaters_in_place() {
        let mut sim = sim();
        sim.set_gravity(Vec2::ZERO);
        let player = sim
            .spawn(EntityKind::Player, Vec2::new(0.0, 5.0), Vec2::ONE)
            .unwrap();
        sim.step(&FrameInput::default()).unwrap();
        assert_eq!(
            sim.store().by_handle(player).unwrap().position,
            Vec2::new(0.0, 5.0)
        );
    }
}
