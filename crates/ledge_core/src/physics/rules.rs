//! Per-kind collision policy
//!
//! The solver and integrator never branch on entity kinds themselves; they
//! ask this table whether two kinds interact and what each side does on
//! contact. New kinds extend the table, not the solver.

use crate::entity::{Entity, EntityFlags, EntityKind};

/// What an entity does to itself when it touches another kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CollisionResponse {
    #[default]
    Nothing,
    /// Flag for removal at the end of the frame.
    MarkRemove,
    FlipFacing,
}

impl CollisionResponse {
    pub fn apply(self, entity: &mut Entity) {
        match self {
            CollisionResponse::Nothing => {}
            CollisionResponse::MarkRemove => entity.mark_for_removal(),
            CollisionResponse::FlipFacing => entity.flags.toggle(EntityFlags::FACES_LEFT),
        }
    }
}

const N: usize = EntityKind::COUNT;

/// Symmetric collide-with matrix plus a directed response matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionRules {
    collides: [[bool; N]; N],
    responses: [[CollisionResponse; N]; N],
}

impl CollisionRules {
    /// Nothing collides, nothing responds.
    pub fn empty() -> Self {
        Self {
            collides: [[false; N]; N],
            responses: [[CollisionResponse::Nothing; N]; N],
        }
    }

    /// Let `a` and `b` collide (both directions).
    pub fn allow(mut self, a: EntityKind, b: EntityKind) -> Self {
        self.collides[a.index()][b.index()] = true;
        self.collides[b.index()][a.index()] = true;
        self
    }

    /// `kind` applies `response` to itself whenever it touches `other`.
    pub fn on_collide(
        mut self,
        kind: EntityKind,
        other: EntityKind,
        response: CollisionResponse,
    ) -> Self {
        self.responses[kind.index()][other.index()] = response;
        self
    }

    /// `kind` applies `response` on touching anything.
    pub fn on_any_collide(mut self, kind: EntityKind, response: CollisionResponse) -> Self {
        self.responses[kind.index()] = [response; N];
        self
    }

    #[inline]
    pub fn collides_with(&self, a: EntityKind, b: EntityKind) -> bool {
        self.collides[a.index()][b.index()] && self.collides[b.index()][a.index()]
    }

    #[inline]
    pub fn response(&self, kind: EntityKind, other: EntityKind) -> CollisionResponse {
        self.responses[kind.index()][other.index()]
    }
}

impl Default for CollisionRules {
    /// The stock gameplay table.
    fn default() -> Self {
        use CollisionResponse::*;
        use EntityKind::*;

        Self::empty()
            .allow(Player, Tile)
            .allow(Player, Spikes)
            .allow(Player, Pickup)
            .allow(Player, Patroller)
            .allow(Laser, Tile)
            .allow(Patroller, Tile)
            .allow(Patroller, Spikes)
            .on_collide(Pickup, Player, MarkRemove)
            .on_collide(Player, Spikes, MarkRemove)
            .on_collide(Patroller, Player, FlipFacing)
            .on_any_collide(Laser, MarkRemove)
    }
}
