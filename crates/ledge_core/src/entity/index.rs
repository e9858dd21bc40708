//! Handle → slot index
//!
//! A fixed-capacity chained hash table. Chain nodes live in an arena and are
//! addressed by `u32` index; released nodes go onto a free list of indices.
//! Bucket 0 belongs to the null handle and is never linked.

use super::Handle;
use crate::error::{CoreError, Resource};

type NodeId = u32;

#[derive(Debug, Clone, Copy)]
struct IndexNode {
    handle: Handle,
    slot: usize,
    next: Option<NodeId>,
}

/// Maps live handles to their current slot in the entity store.
#[derive(Debug)]
pub struct HandleIndex {
    buckets: Vec<Option<NodeId>>,
    nodes: Vec<IndexNode>,
    free: Vec<NodeId>,
    capacity: usize,
    len: usize,
}

impl HandleIndex {
    /// `bucket_count` includes the reserved bucket 0.
    ///
    /// # Panics
    ///
    /// If `bucket_count` is less than 2. `SimConfig::validate` rejects such
    /// configurations before a `Simulation` builds its index.
    pub fn new(bucket_count: usize, capacity: usize) -> Self {
        assert!(bucket_count >= 2, "handle index needs a bucket besides bucket 0");
        Self {
            buckets: vec![None; bucket_count],
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
            len: 0,
        }
    }

    #[inline]
    fn bucket_of(&self, handle: Handle) -> usize {
        let usable = (self.buckets.len() - 1) as i64;
        1 + i64::from(handle.raw()).rem_euclid(usable) as usize
    }

    fn find(&self, handle: Handle) -> Option<NodeId> {
        let mut cursor = self.buckets[self.bucket_of(handle)];
        while let Some(id) = cursor {
            let node = &self.nodes[id as usize];
            if node.handle == handle {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    fn alloc_node(&mut self) -> Result<NodeId, CoreError> {
        if let Some(id) = self.free.pop() {
            let node = &self.nodes[id as usize];
            assert!(
                node.next.is_none(),
                "freed index node {id} still links to {:?}",
                node.next
            );
            return Ok(id);
        }
        if self.nodes.len() >= self.capacity {
            return Err(CoreError::full(Resource::HandleIndex, self.capacity));
        }
        self.nodes.push(IndexNode {
            handle: Handle::NULL,
            slot: 0,
            next: None,
        });
        Ok((self.nodes.len() - 1) as NodeId)
    }

    /// Insert a mapping, or overwrite the slot of an existing one.
    pub fn register(&mut self, handle: Handle, slot: usize) -> Result<(), CoreError> {
        if handle.is_null() {
            return Err(CoreError::NullHandle);
        }
        if let Some(id) = self.find(handle) {
            self.nodes[id as usize].slot = slot;
            return Ok(());
        }

        let id = self.alloc_node()?;
        let bucket = self.bucket_of(handle);
        self.nodes[id as usize] = IndexNode {
            handle,
            slot,
            next: self.buckets[bucket],
        };
        self.buckets[bucket] = Some(id);
        self.len += 1;
        Ok(())
    }

    /// Current slot of `handle`, or `None` once it has been released.
    pub fn resolve(&self, handle: Handle) -> Option<usize> {
        if handle.is_null() {
            return None;
        }
        self.find(handle).map(|id| self.nodes[id as usize].slot)
    }

    /// Point an existing mapping at a new slot. Returns `false` if the
    /// handle is not registered.
    pub fn relocate(&mut self, handle: Handle, new_slot: usize) -> bool {
        match self.find(handle) {
            Some(id) => {
                self.nodes[id as usize].slot = new_slot;
                true
            }
            None => false,
        }
    }

    /// Drop a mapping and return its node to the free list.
    pub fn release(&mut self, handle: Handle) -> bool {
        if handle.is_null() {
            return false;
        }
        let bucket = self.bucket_of(handle);
        let mut prev: Option<NodeId> = None;
        let mut cursor = self.buckets[bucket];

        while let Some(id) = cursor {
            let node = self.nodes[id as usize];
            if node.handle == handle {
                match prev {
                    Some(p) => self.nodes[p as usize].next = node.next,
                    None => self.buckets[bucket] = node.next,
                }
                let freed = &mut self.nodes[id as usize];
                freed.next = None;
                freed.handle = Handle::NULL;
                self.free.push(id);
                self.len -= 1;
                return true;
            }
            prev = cursor;
            cursor = node.next;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.nodes.clear();
        self.free.clear();
        self.len = 0;
    }
}
