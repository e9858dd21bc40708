use std::fmt;
use thiserror::Error;

/// Fixed-capacity resources that can run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    EntityStore,
    HandleIndex,
    /// The positive `i32` range handles are drawn from.
    HandleSpace,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::EntityStore => "entity store",
            Resource::HandleIndex => "handle index",
            Resource::HandleSpace => "handle space",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by mutating core operations.
///
/// Stale handles are not errors; lookups return `None` for them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("{resource} is full (capacity {capacity})")]
    CapacityExceeded { resource: Resource, capacity: usize },

    #[error("handle 0 is reserved for the null entity")]
    NullHandle,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl CoreError {
    pub(crate) fn full(resource: Resource, capacity: usize) -> Self {
        tracing::warn!(%resource, capacity, "capacity exceeded");
        CoreError::CapacityExceeded { resource, capacity }
    }
}
