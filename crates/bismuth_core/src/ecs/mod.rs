//! # Entity Component System
//!
//! Sparse-set component storage with per-entity type masks.
//!
//! ## Design
//!
//! - Entities are plain indices, issued sequentially and never reused
//! - Each component type lives in its own pool: a dense array plus a
//!   sparse `entity -> dense index` map
//! - A 64-bit mask per entity records which types it holds
//! - Views walk the smallest participating pool and look up the others

mod component;
mod entity;
mod registry;
mod slot;
mod storage;
mod view;

pub use component::{Component, ComponentSlot, ComponentType, MAX_COMPONENT_TYPES};
pub use entity::{ComponentMask, EntityId, MaskIter};
pub use registry::Registry;
pub use slot::SlotTable;
pub use storage::{ComponentPool, ErasedPool, INVALID_INDEX};
pub use view::{View, ViewComponents, ViewIter};
