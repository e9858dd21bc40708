use super::{DrawOrder, EntityFlags, EntityKind, Handle};
use crate::math::{Aabb, Vec2};

/// One simulated object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    handle: Handle,
    pub kind: EntityKind,
    pub draw_order: DrawOrder,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Visual/click box, full extents.
    pub render_size: Vec2,
    /// Collision box center relative to `position`.
    pub collision_offset: Vec2,
    /// Collision box half-extents.
    pub collision_size: Vec2,
    pub flags: EntityFlags,
    /// Seconds until the entity flags itself for removal.
    pub lifetime: Option<f32>,
}

impl Entity {
    /// Build an entity with its kind's default flags and a collision box
    /// matching the render box.
    pub(crate) fn new(
        handle: Handle,
        kind: EntityKind,
        draw_order: DrawOrder,
        position: Vec2,
        render_size: Vec2,
    ) -> Self {
        Self {
            handle,
            kind,
            draw_order,
            position,
            velocity: Vec2::ZERO,
            render_size,
            collision_offset: Vec2::ZERO,
            collision_size: render_size * 0.5,
            flags: kind.default_flags(),
            lifetime: None,
        }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Collision box in world space.
    #[inline]
    pub fn collision_box(&self) -> Aabb {
        Aabb::new(self.position + self.collision_offset, self.collision_size)
    }

    #[inline]
    pub fn has(&self, flags: EntityFlags) -> bool {
        self.flags.contains(flags)
    }

    /// -1 when facing left, 1 otherwise.
    #[inline]
    pub fn facing_sign(&self) -> f32 {
        if self.has(EntityFlags::FACES_LEFT) {
            -1.0
        } else {
            1.0
        }
    }

    pub fn mark_for_removal(&mut self) {
        self.flags.insert(EntityFlags::REMOVE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_box_defaults_to_render_box() {
        let e = Entity::new(
            Handle::from_raw(1),
            EntityKind::Tile,
            DrawOrder::Terrain,
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 2.0),
        );
        let b = e.collision_box();
        assert_eq!(b.min(), Vec2::new(1.5, 0.0));
        assert_eq!(b.max(), Vec2::new(2.5, 2.0));
        assert!(e.has(EntityFlags::SOLID));
        assert_eq!(e.facing_sign(), 1.0);
    }
}
