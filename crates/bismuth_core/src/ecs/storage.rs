//! # Component Storage
//!
//! Sparse-set storage for a single component type.
//!
//! Three parallel arrays:
//! - `locations[entity]` -> index into the dense arrays, or [`INVALID_INDEX`]
//! - `components[i]`     -> the component value
//! - `entities[i]`       -> the entity owning `components[i]`
//!
//! Add, remove, lookup and membership are O(1). Removal swaps the last dense
//! element into the hole, so dense order is unspecified and changes on
//! every removal.

use std::any::{type_name, Any};

use bytemuck::Pod;

use super::component::Component;
use super::entity::EntityId;
use crate::error::{RegistryError, RegistryResult};

/// Sentinel stored in `locations` for entities without a component.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Type-erased view of a [`ComponentPool`].
///
/// Whole-entity teardown visits pools by slot without knowing their
/// component type; this is the only capability it needs. Typed access goes
/// through [`ErasedPool::as_any`] and a downcast to the concrete pool.
pub trait ErasedPool: Any {
    /// Removes the entity's component if present.
    fn remove_entity(&mut self, entity: EntityId);

    /// Checks if the entity has a component in this pool.
    fn contains(&self, entity: EntityId) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Returns true if the pool stores nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse-set storage for one component type.
///
/// This storage guarantees:
/// - O(1) add, remove, lookup and membership test
/// - Contiguous component values for cache-friendly iteration
/// - `entities[locations[e]] == e` for every present entity `e`
///
/// # Type Parameters
///
/// * `C` - The component type to store
///
/// # Example
///
/// ```rust
/// use bismuth_core::{ComponentPool, EntityId};
///
/// let mut pool: ComponentPool<u32> = ComponentPool::new();
/// pool.add(EntityId::new(3), 7);
/// assert!(pool.has(EntityId::new(3)));
/// assert_eq!(pool.get(EntityId::new(3)), Ok(&7));
/// ```
pub struct ComponentPool<C: Component> {
    /// Entity index -> dense index, sized to the largest entity ever added.
    locations: Vec<u32>,
    /// The dense array of components.
    components: Vec<C>,
    /// Owner of each dense slot.
    entities: Vec<EntityId>,
}

impl<C: Component> ComponentPool<C> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locations: Vec::new(),
            components: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Returns the number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the pool stores nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the dense index of the entity's component, if present.
    #[inline]
    #[must_use]
    pub fn dense_index(&self, entity: EntityId) -> Option<usize> {
        match self.locations.get(entity.index()) {
            Some(&index) if index != INVALID_INDEX => Some(index as usize),
            _ => None,
        }
    }

    /// Checks if the entity has a component in this pool.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: EntityId) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Gets the entity's component.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ComponentNotFound`] if the entity has no
    /// component in this pool.
    #[inline]
    pub fn get(&self, entity: EntityId) -> RegistryResult<&C> {
        self.find(entity).ok_or_else(|| not_found::<C>(entity))
    }

    /// Gets the entity's component mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ComponentNotFound`] if the entity has no
    /// component in this pool.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> RegistryResult<&mut C> {
        self.find_mut(entity).ok_or_else(|| not_found::<C>(entity))
    }

    /// Gets the entity's component, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn find(&self, entity: EntityId) -> Option<&C> {
        let index = self.dense_index(entity)?;
        self.components.get(index)
    }

    /// Gets the entity's component mutably, or `None` if absent.
    #[inline]
    pub fn find_mut(&mut self, entity: EntityId) -> Option<&mut C> {
        let index = self.dense_index(entity)?;
        self.components.get_mut(index)
    }

    /// Stores a component for the entity.
    ///
    /// If the entity already has one it is overwritten in place: its dense
    /// index and every other entry stay where they are.
    ///
    /// # Returns
    ///
    /// The replaced value, or `None` if the entity had no component.
    ///
    /// # Panics
    ///
    /// Panics if the pool already holds `u32::MAX` components. A registry
    /// never issues enough entity ids to get there.
    pub fn add(&mut self, entity: EntityId, component: C) -> Option<C> {
        if let Some(index) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.components[index], component));
        }

        if entity.index() >= self.locations.len() {
            self.locations.resize(entity.index() + 1, INVALID_INDEX);
        }

        let Some(location) = dense_location(self.components.len()) else {
            panic!("component pool for `{}` is full", type_name::<C>());
        };
        self.locations[entity.index()] = location;
        self.components.push(component);
        self.entities.push(entity);
        None
    }

    /// Removes the entity's component using swap-remove.
    ///
    /// The last dense element moves into the vacated slot and its location
    /// is patched. Removing an absent component is a no-op.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the entity had no component.
    pub fn remove(&mut self, entity: EntityId) -> Option<C> {
        let index = self.dense_index(entity)?;

        let component = self.components.swap_remove(index);
        self.entities.swap_remove(index);

        // Patch the entry that was moved into the hole (if any)
        let vacated = std::mem::replace(&mut self.locations[entity.index()], INVALID_INDEX);
        if let Some(&moved) = self.entities.get(index) {
            self.locations[moved.index()] = vacated;
        }

        Some(component)
    }

    /// Pre-sizes storage for entity ids below `capacity`.
    ///
    /// Purely an allocation hint: membership is unchanged.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.locations.len() {
            self.locations.resize(capacity, INVALID_INDEX);
        }
        self.components
            .reserve(capacity.saturating_sub(self.components.len()));
        self.entities
            .reserve(capacity.saturating_sub(self.entities.len()));
    }

    /// Removes every component. Location capacity is kept.
    pub fn clear(&mut self) {
        for entity in self.entities.drain(..) {
            self.locations[entity.index()] = INVALID_INDEX;
        }
        self.components.clear();
    }

    /// Returns the dense component array.
    ///
    /// Order is unspecified and changes on removal.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Returns the dense component array mutably.
    ///
    /// Values can be changed, the set of entities cannot.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [C] {
        &mut self.components
    }

    /// Returns the dense owner array, parallel to [`Self::components`].
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Iterates over `(entity, component)` in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterates mutably over `(entity, component)` in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }
}

impl<C: Component + Pod> ComponentPool<C> {
    /// Returns the dense component array as raw bytes.
    ///
    /// Useful for bulk uploads (e.g. into a GPU buffer) without copying
    /// component by component.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.components)
    }
}

impl<C: Component> Default for ComponentPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ErasedPool for ComponentPool<C> {
    fn remove_entity(&mut self, entity: EntityId) {
        self.remove(entity);
    }

    fn contains(&self, entity: EntityId) -> bool {
        self.has(entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Location value for dense index `index`, or `None` if it would not fit
/// below [`INVALID_INDEX`].
fn dense_location(index: usize) -> Option<u32> {
    u32::try_from(index).ok().filter(|&location| location != INVALID_INDEX)
}

pub(crate) fn not_found<C: Component>(entity: EntityId) -> RegistryError {
    RegistryError::ComponentNotFound {
        entity,
        component: type_name::<C>(),
    }
}
