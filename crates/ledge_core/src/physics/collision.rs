//! Swept AABB time-of-impact
//!
//! The moving box is shrunk to its center point and every candidate box is
//! grown by the mover's half-extents (Minkowski sum), so box-vs-box
//! sweeping becomes point-vs-box. Each of the four grown edges is solved
//! for the parametric time the point crosses it.
//!
//! There is no broad phase: every call scans the whole store.

use super::CollisionRules;
use crate::entity::{Entity, EntityFlags, EntityKind, EntityStore, Handle};
use crate::math::Vec2;

/// Which motion component a hit blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    /// A left or right edge was hit; x-motion is blocked.
    Horizontal,
    /// A top or bottom edge was hit; y-motion is blocked.
    Vertical,
}

/// Earliest impact along a displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionQuery {
    /// Fraction of the displacement that can be completed, in `[0, 1]`.
    pub t: f32,
    pub hit: Option<Handle>,
    pub hit_kind: Option<EntityKind>,
    pub hit_solid: bool,
    pub axis: Option<HitAxis>,
}

impl CollisionQuery {
    /// Unobstructed.
    pub const CLEAR: CollisionQuery = CollisionQuery {
        t: 1.0,
        hit: None,
        hit_kind: None,
        hit_solid: false,
        axis: None,
    };

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

impl Default for CollisionQuery {
    fn default() -> Self {
        Self::CLEAR
    }
}

/// Tolerance for landing on a grown box's corner.
const CORNER_SLOP: f32 = 1e-5;

/// One edge of a grown box, seen from the axis perpendicular to it.
struct Edge {
    at: f32,
    /// +1 for max edges, -1 for min edges.
    outward: f32,
    span_min: f32,
    span_max: f32,
}

impl Edge {
    /// Time the point `p` moving by `d` crosses this edge, where `p.0`/`d.0`
    /// are perpendicular to the edge and `p.1`/`d.1` run along it.
    fn crossing(&self, p: (f32, f32), d: (f32, f32), t_best: f32) -> Option<f32> {
        if d.0 == 0.0 {
            return None;
        }
        let t = (self.at - p.0) / d.0;
        if !(t >= 0.0 && t < t_best) {
            return None;
        }
        // Resting exactly on the edge and moving away is not an impact.
        if t == 0.0 && d.0 * self.outward > 0.0 {
            return None;
        }
        let along = p.1 + t * d.1;
        let inside = along > self.span_min && along < self.span_max;
        // Entering exactly through a corner lands on a span endpoint. Count
        // it when the point crosses inward and its parallel motion heads into
        // the span; grazing an edge or skimming past the corner still misses.
        let inward = d.0 * self.outward < 0.0;
        let at_corner = inward
            && (((along - self.span_min).abs() <= CORNER_SLOP && d.1 > 0.0)
                || ((along - self.span_max).abs() <= CORNER_SLOP && d.1 < 0.0));
        (inside || at_corner).then_some(t)
    }
}

/// Earliest time-of-impact of `mover` displaced by `delta` against every other
/// collidable entity the rules let it touch. Handles in `ignore` are skipped.
///
/// Zero-area boxes, on either side, never collide.
pub fn sweep(
    store: &EntityStore,
    rules: &CollisionRules,
    mover: &Entity,
    delta: Vec2,
    ignore: &[Handle],
) -> CollisionQuery {
    let mut result = CollisionQuery::CLEAR;
    if delta == Vec2::ZERO || !mover.has(EntityFlags::COLLIDABLE) {
        return result;
    }
    let moving = mover.collision_box();
    if moving.is_degenerate() {
        return result;
    }
    let p = moving.center;

    for other in store.iter() {
        if other.handle() == mover.handle()
            || !other.has(EntityFlags::COLLIDABLE)
            || other.has(EntityFlags::REMOVE)
            || !rules.collides_with(mover.kind, other.kind)
            || ignore.contains(&other.handle())
        {
            continue;
        }
        let target = other.collision_box();
        if target.is_degenerate() {
            continue;
        }

        let grown = target.expanded(moving.half);
        let (min, max) = (grown.min(), grown.max());
        let vertical_edges = [(min.x, -1.0), (max.x, 1.0)].map(|(at, outward)| Edge {
            at,
            outward,
            span_min: min.y,
            span_max: max.y,
        });
        let horizontal_edges = [(min.y, -1.0), (max.y, 1.0)].map(|(at, outward)| Edge {
            at,
            outward,
            span_min: min.x,
            span_max: max.x,
        });

        for edge in &vertical_edges {
            if let Some(t) = edge.crossing((p.x, p.y), (delta.x, delta.y), result.t) {
                result = hit(other, t, HitAxis::Horizontal);
            }
        }
        for edge in &horizontal_edges {
            if let Some(t) = edge.crossing((p.y, p.x), (delta.y, delta.x), result.t) {
                result = hit(other, t, HitAxis::Vertical);
            }
        }
    }

    if let Some(other) = result.hit {
        tracing::trace!(
            mover = %mover.handle(),
            %other,
            t = result.t,
            axis = ?result.axis,
            solid = result.hit_solid,
            "sweep hit"
        );
    }
    result
}

fn hit(other: &Entity, t: f32, axis: HitAxis) -> CollisionQuery {
    CollisionQuery {
        t,
        hit: Some(other.handle()),
        hit_kind: Some(other.kind),
        hit_solid: other.has(EntityFlags::SOLID),
        axis: Some(axis),
    }
}
