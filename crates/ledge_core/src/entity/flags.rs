use std::ops::{BitOr, BitOrAssign};

/// Per-entity behavior bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct EntityFlags(u32);

impl EntityFlags {
    pub const NONE: Self = Self(0);
    /// Takes part in collision queries at all.
    pub const COLLIDABLE: Self = Self(1 << 0);
    /// Blocks movers that hit it.
    pub const SOLID: Self = Self(1 << 1);
    pub const FACES_LEFT: Self = Self(1 << 2);
    pub const IGNORES_GRAVITY: Self = Self(1 << 3);
    pub const IGNORES_FRICTION: Self = Self(1 << 4);
    /// Dropped by the next `EntityStore::remove_flagged` pass.
    pub const REMOVE: Self = Self(1 << 5);
    /// Last move was blocked along the gravity direction.
    pub const ON_GROUND: Self = Self(1 << 6);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[inline]
    pub fn toggle(&mut self, other: Self) {
        self.0 ^= other.0;
    }

    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for EntityFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EntityFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
