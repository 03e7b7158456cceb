//! # Component System
//!
//! Components are plain values attached to entities. Any `'static` type can
//! be a component; the registry assigns it a [`ComponentSlot`] the first time
//! the type is used.

use std::any::{type_name, TypeId};
use std::fmt;

use super::entity::ComponentMask;
use super::storage::{ComponentPool, ErasedPool};

/// Maximum number of distinct component types one registry can track.
///
/// Equal to the width of [`ComponentMask`].
pub const MAX_COMPONENT_TYPES: usize = ComponentMask::BITS;

/// Marker trait for ECS components.
///
/// Implemented for every `'static` type. Values are moved into the dense
/// array on insert and relocated by move on swap-remove.
///
/// # Example
///
/// ```rust
/// use bismuth_core::Registry;
///
/// #[derive(Debug, PartialEq)]
/// struct Position {
///     x: i32,
///     y: i32,
/// }
///
/// let mut registry = Registry::new();
/// let entity = registry.create_entity();
/// registry.emplace_component(entity, Position { x: 4, y: 2 })?;
/// assert!(registry.has_component::<Position>(entity));
/// # Ok::<(), bismuth_core::RegistryError>(())
/// ```
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Small integer identifying a component type within one registry (0-63).
///
/// Slots are assigned in first-use order and are not stable across runs.
/// Never persist them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentSlot(u8);

impl ComponentSlot {
    /// Creates a slot from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw slot number.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns the slot as a `usize` index into the pool table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime description of a component type.
///
/// Carries what the registry needs to register a type without knowing it
/// statically: its `TypeId`, its name for diagnostics, and a constructor for
/// an empty type-erased pool.
#[derive(Clone, Copy)]
pub struct ComponentType {
    type_id: TypeId,
    name: &'static str,
    new_pool: fn(usize) -> Box<dyn ErasedPool>,
}

impl ComponentType {
    /// Describes the component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        fn new_pool<T: Component>(capacity: usize) -> Box<dyn ErasedPool> {
            let mut pool = ComponentPool::<T>::new();
            pool.reserve(capacity);
            Box::new(pool)
        }

        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            new_pool: new_pool::<T>,
        }
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the described type.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds an empty pool for the described type, reserving `capacity`.
    #[must_use]
    pub fn new_pool(&self, capacity: usize) -> Box<dyn ErasedPool> {
        (self.new_pool)(capacity)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ComponentType {}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_identity() {
        assert_eq!(ComponentType::of::<u8>(), ComponentType::of::<u8>());
        assert_ne!(ComponentType::of::<u8>(), ComponentType::of::<i8>());
        assert_eq!(ComponentType::of::<String>().name(), type_name::<String>());
    }

    #[test]
    fn test_new_pool_is_empty() {
        let pool = ComponentType::of::<u32>().new_pool(16);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.component_name(), type_name::<u32>());
    }

    #[test]
    fn test_max_component_types_matches_mask_width() {
        assert_eq!(MAX_COMPONENT_TYPES, 64);
    }
}
