//! Draw-order sorted entity storage
//!
//! Entities are kept in one dense array sorted by `DrawOrder`, so renderers
//! and the frame update walk it front to back. Insertion and compaction move
//! slots; every moved entity is relocated in the `HandleIndex` before the
//! operation returns.

use super::{DrawOrder, Entity, EntityFlags, EntityKind, Handle, HandleIndex};
use crate::error::{CoreError, Resource};
use crate::math::Vec2;

pub struct EntityStore {
    entities: Vec<Entity>,
    index: HandleIndex,
    capacity: usize,
    next_handle: i32,
}

impl EntityStore {
    /// Create an empty store. The index gets one node per storable entity.
    ///
    /// # Panics
    ///
    /// If `index_buckets` is less than 2 (see `HandleIndex::new`).
    pub fn new(capacity: usize, index_buckets: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            index: HandleIndex::new(index_buckets, capacity),
            capacity,
            next_handle: 1,
        }
    }

    /// Insert a new entity and return its handle.
    ///
    /// The entity goes in front of the first entity whose draw order is
    /// greater than or equal to its own (at the back if there is none).
    /// All entities behind it shift one slot to the right.
    pub fn add(
        &mut self,
        kind: EntityKind,
        draw_order: DrawOrder,
        position: Vec2,
        render_size: Vec2,
    ) -> Result<Handle, CoreError> {
        if self.entities.len() >= self.capacity {
            return Err(CoreError::full(Resource::EntityStore, self.capacity));
        }
        if self.next_handle == i32::MAX {
            return Err(CoreError::full(Resource::HandleSpace, i32::MAX as usize));
        }

        let handle = Handle::from_raw(self.next_handle);
        let slot = self
            .entities
            .iter()
            .position(|e| e.draw_order >= draw_order)
            .unwrap_or(self.entities.len());

        // Register first: a full index must leave the array untouched.
        self.index.register(handle, slot)?;
        self.next_handle += 1;

        self.entities
            .insert(slot, Entity::new(handle, kind, draw_order, position, render_size));
        for (moved_to, entity) in self.entities.iter().enumerate().skip(slot + 1) {
            let moved = self.index.relocate(entity.handle(), moved_to);
            debug_assert!(moved, "shifted entity {} was not indexed", entity.handle());
        }

        tracing::debug!(%handle, ?kind, ?draw_order, slot, "entity added");
        Ok(handle)
    }

    /// Drop every entity flagged `REMOVE`, compacting the array in place.
    ///
    /// After a removal the same slot is examined again, since compaction has
    /// just moved the next entity into it. Returns the number removed.
    pub fn remove_flagged(&mut self) -> usize {
        let mut removed = 0;
        let mut slot = 0;
        while slot < self.entities.len() {
            if !self.entities[slot].has(EntityFlags::REMOVE) {
                slot += 1;
                continue;
            }

            let gone = self.entities.remove(slot);
            let released = self.index.release(gone.handle());
            debug_assert!(released, "removed entity {} was not indexed", gone.handle());
            for (moved_to, entity) in self.entities.iter().enumerate().skip(slot) {
                self.index.relocate(entity.handle(), moved_to);
            }
            removed += 1;
        }

        if removed > 0 {
            tracing::debug!(removed, live = self.entities.len(), "entities compacted");
        }
        removed
    }

    pub fn by_handle(&self, handle: Handle) -> Option<&Entity> {
        let slot = self.index.resolve(handle)?;
        let entity = self.entities.get(slot)?;
        debug_assert_eq!(entity.handle(), handle, "handle index out of sync");
        Some(entity)
    }

    pub fn by_handle_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        let slot = self.index.resolve(handle)?;
        let entity = self.entities.get_mut(slot)?;
        debug_assert_eq!(entity.handle(), handle, "handle index out of sync");
        Some(entity)
    }

    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.index.resolve(handle).is_some()
    }

    /// Current slot of a live handle. Only valid until the next `add` or
    /// `remove_flagged`.
    #[inline]
    pub fn slot_of(&self, handle: Handle) -> Option<usize> {
        self.index.resolve(handle)
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Entity> {
        self.entities.get(slot)
    }

    /// Entities in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Handles of all live entities, in draw order.
    pub fn handles(&self) -> Vec<Handle> {
        self.entities.iter().map(Entity::handle).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
