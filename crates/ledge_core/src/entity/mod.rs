//! Entity identity and storage.
//!
//! Entities live in one dense array sorted by draw order. Handles are the
//! only identifier that stays valid across frames; slots move whenever the
//! array is inserted into or compacted, and the handle index follows them.

mod entity;
mod flags;
mod handle;
mod index;
mod kind;
mod store;

pub use entity::Entity;
pub use flags::EntityFlags;
pub use handle::Handle;
pub use index::HandleIndex;
pub use kind::{DrawOrder, EntityKind};
pub use store::EntityStore;
