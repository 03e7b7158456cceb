//! # Bismuth Core
//!
//! Sparse-set Entity Component System storage:
//! - Per-type component pools with O(1) add, lookup and swap-remove
//! - A 64-bit component mask per entity
//! - Multi-component views driven by the smallest pool
//! - A store of registry-wide singletons, one value per type
//!
//! ## Architecture Rules
//!
//! 1. **Dense storage** - Components of one type are contiguous in memory
//! 2. **No id reuse** - Entity ids are issued sequentially and never recycled
//! 3. **Checked access** - Missing entities and components are errors, not panics
//!
//! ## Example
//!
//! ```rust
//! use bismuth_core::{Registry, RegistryError};
//!
//! struct Position { x: i32, y: i32 }
//! struct Velocity { x: i32, y: i32 }
//!
//! let mut registry = Registry::new();
//! let player = registry.create_entity();
//! registry.emplace_component(player, Position { x: 4, y: 2 })?;
//! registry.emplace_component(player, Velocity { x: 1, y: 0 })?;
//!
//! registry
//!     .view::<(Position, Velocity)>()?
//!     .for_each_mut(|_, (position, velocity)| {
//!         position.x += velocity.x;
//!         position.y += velocity.y;
//!     });
//!
//! assert_eq!(registry.get_component::<Position>(player)?.x, 5);
//! # Ok::<(), RegistryError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod singleton;

pub use config::RegistryConfig;
pub use ecs::{
    Component, ComponentMask, ComponentPool, ComponentSlot, ComponentType, EntityId, ErasedPool,
    Registry, SlotTable, View, ViewComponents, ViewIter, INVALID_INDEX, MAX_COMPONENT_TYPES,
};
pub use error::{RegistryError, RegistryResult};
pub use singleton::SingletonStore;
