//! Stable entity handle
//!
//! Handles are allocated sequentially from 1 and never reused within a run,
//! so a stale handle simply stops resolving once its entity is removed.

use std::fmt;

/// Entity handle (opaque, stable for the entity's lifetime)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(i32);

impl Handle {
    /// "No entity".
    pub const NULL: Handle = Handle(0);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
