use super::EntityFlags;

/// Layering order; also the entity store's sort key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DrawOrder {
    Background = 0,
    Terrain = 1,
    Items = 2,
    Actors = 3,
    Player = 4,
    Projectiles = 5,
    Overlay = 6,
}

/// Gameplay type of an entity.
///
/// Collision filtering and responses are looked up per kind pair in
/// `CollisionRules`, indexed by `EntityKind::index`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Tile,
    Spikes,
    Laser,
    Pickup,
    Patroller,
}

impl EntityKind {
    pub const COUNT: usize = 6;

    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::Player,
        EntityKind::Tile,
        EntityKind::Spikes,
        EntityKind::Laser,
        EntityKind::Pickup,
        EntityKind::Patroller,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Flags a freshly spawned entity of this kind starts with.
    pub fn default_flags(self) -> EntityFlags {
        use EntityFlags as F;
        match self {
            EntityKind::Player => F::COLLIDABLE | F::SOLID,
            EntityKind::Tile => F::COLLIDABLE | F::SOLID | F::IGNORES_GRAVITY,
            EntityKind::Spikes => F::COLLIDABLE | F::IGNORES_GRAVITY,
            EntityKind::Laser => F::COLLIDABLE | F::IGNORES_GRAVITY | F::IGNORES_FRICTION,
            EntityKind::Pickup => F::COLLIDABLE | F::IGNORES_GRAVITY,
            EntityKind::Patroller => F::COLLIDABLE | F::SOLID | F::IGNORES_FRICTION,
        }
    }

    pub fn default_draw_order(self) -> DrawOrder {
        match self {
            EntityKind::Player => DrawOrder::Player,
            EntityKind::Tile | EntityKind::Spikes => DrawOrder::Terrain,
            EntityKind::Laser => DrawOrder::Projectiles,
            EntityKind::Pickup => DrawOrder::Items,
            EntityKind::Patroller => DrawOrder::Actors,
        }
    }

    /// Static kinds are never driven by the integrator.
    pub fn is_static(self) -> bool {
        matches!(
            self,
            EntityKind::Tile | EntityKind::Spikes | EntityKind::Pickup
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_the_table() {
        for (i, kind) in EntityKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn draw_order_is_total() {
        assert!(DrawOrder::Background < DrawOrder::Terrain);
        assert!(DrawOrder::Player < DrawOrder::Projectiles);
    }
}
