//! # Registry
//!
//! The central container for all entities and components.
//!
//! The registry owns one [`ComponentPool`] per component type (type-erased
//! behind [`ErasedPool`], indexed by slot) plus one [`ComponentMask`] per
//! entity. Every typed operation resolves the type's slot, forwards to the
//! pool, and keeps the entity's mask in step with it:
//!
//! ```text
//! bit s of masks[e] is set  <=>  pools[s] contains e
//! ```

use std::any::type_name;

use super::component::{Component, ComponentSlot, ComponentType, MAX_COMPONENT_TYPES};
use super::entity::{ComponentMask, EntityId};
use super::slot::SlotTable;
use super::storage::{not_found, ComponentPool, ErasedPool};
use super::view::{View, ViewComponents};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::singleton::SingletonStore;

/// The registry - container for all entities, components and singletons.
///
/// # Example
///
/// ```rust
/// use bismuth_core::Registry;
///
/// struct Position(i32, i32);
/// struct Velocity(i32, i32);
///
/// let mut registry = Registry::new();
/// let entity = registry.create_entity();
/// registry.emplace_component(entity, Position(0, 0))?;
/// registry.emplace_component(entity, Velocity(1, 2))?;
///
/// let mut view = registry.view::<(Position, Velocity)>()?;
/// view.for_each_mut(|_, (position, velocity)| {
///     position.0 += velocity.0;
///     position.1 += velocity.1;
/// });
///
/// assert_eq!(registry.get_component::<Position>(entity)?.1, 2);
/// # Ok::<(), bismuth_core::RegistryError>(())
/// ```
pub struct Registry {
    /// Component mask of every entity ever created, indexed by entity id.
    masks: Vec<ComponentMask>,
    /// Component type -> slot.
    slots: SlotTable,
    /// One pool per registered type, indexed by slot.
    pools: Vec<Box<dyn ErasedPool>>,
    /// Per-type singletons.
    singletons: SingletonStore,
    /// Capacity hints.
    config: RegistryConfig,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with capacity hints.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            masks: Vec::with_capacity(config.entity_capacity),
            slots: SlotTable::new(),
            pools: Vec::new(),
            singletons: SingletonStore::new(),
            config,
        }
    }

    /// Returns the capacity hints this registry was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Maximum number of entities one registry can create.
    ///
    /// Id `u32::MAX` is never issued, so a pool's dense index can never
    /// collide with [`INVALID_INDEX`](super::INVALID_INDEX).
    pub const MAX_ENTITIES: usize = u32::MAX as usize;

    /// Creates a new entity with no components.
    ///
    /// Ids are handed out in increasing order and never reused.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::MAX_ENTITIES`] entities have already been created.
    /// Use [`Self::try_create_entity`] to handle that case.
    pub fn create_entity(&mut self) -> EntityId {
        match self.try_create_entity() {
            Ok(entity) => entity,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a new entity with no components.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EntityLimitExceeded`] if
    /// [`Self::MAX_ENTITIES`] entities have already been created. Nothing
    /// is modified in that case.
    pub fn try_create_entity(&mut self) -> RegistryResult<EntityId> {
        let entity = entity_at(self.masks.len())?;
        self.masks.push(ComponentMask::EMPTY);
        Ok(entity)
    }

    /// Returns the number of entities ever created.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.masks.len()
    }

    /// Checks if the entity was created by this registry.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, entity: EntityId) -> bool {
        entity.index() < self.masks.len()
    }

    /// Returns the entity's component mask, or `None` for an unknown id.
    #[inline]
    #[must_use]
    pub fn component_mask(&self, entity: EntityId) -> Option<ComponentMask> {
        self.masks.get(entity.index()).copied()
    }

    /// Removes every component of the entity.
    ///
    /// The id stays valid (and empty); it is not reused. Unknown ids are
    /// ignored.
    pub fn remove_entity(&mut self, entity: EntityId) {
        let Some(mask) = self.masks.get_mut(entity.index()) else {
            return;
        };

        let held = *mask;
        mask.clear();

        for slot in held {
            if let Some(pool) = self.pools.get_mut(slot.index()) {
                pool.remove_entity(entity);
                tracing::trace!(%entity, %slot, component = pool.component_name(), "removed component");
            }
        }
        tracing::trace!(%entity, components = held.len(), "removed entity");
    }

    // =========================================================================
    // Component types
    // =========================================================================

    /// Returns the number of component types registered so far.
    #[inline]
    #[must_use]
    pub fn component_type_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot assigned to `T`, if it has been used.
    #[inline]
    #[must_use]
    pub fn slot_of<T: Component>(&self) -> Option<ComponentSlot> {
        self.slots.get::<T>()
    }

    /// Returns the pool of `T`, if it has been used.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        let slot = self.slots.get::<T>()?;
        self.pools
            .get(slot.index())?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    /// Reserves storage in the pool of `T` for entity ids below `capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ComponentLimitExceeded`] if `T` is new and
    /// the registry already tracks [`MAX_COMPONENT_TYPES`] types.
    pub fn reserve_components<T: Component>(&mut self, capacity: usize) -> RegistryResult<()> {
        let (_, pool) = self.pool_or_register::<T>()?;
        pool.reserve(capacity);
        Ok(())
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Stores a component on the entity, overwriting any existing one.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidEntity`] if the entity was never created
    /// - [`RegistryError::ComponentLimitExceeded`] if `T` is new and the
    ///   registry already tracks [`MAX_COMPONENT_TYPES`] types
    ///
    /// Nothing is modified when an error is returned.
    pub fn emplace_component<T: Component>(
        &mut self,
        entity: EntityId,
        component: T,
    ) -> RegistryResult<&mut T> {
        self.check_entity(entity)?;
        let (slot, pool) = self.pool_or_register::<T>()?;

        pool.add(entity, component);
        self.masks[entity.index()].insert(slot);

        self.get_component_mut(entity)
    }

    /// Checks if the entity has a component of type `T`.
    ///
    /// Unknown entities and never-used types both answer `false`.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        match (self.slots.get::<T>(), self.masks.get(entity.index())) {
            (Some(slot), Some(mask)) => mask.contains(slot),
            _ => false,
        }
    }

    /// Gets the entity's component of type `T`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidEntity`] if the entity was never created
    /// - [`RegistryError::ComponentNotFound`] if the entity lacks `T`
    pub fn get_component<T: Component>(&self, entity: EntityId) -> RegistryResult<&T> {
        self.check_entity(entity)?;
        match self.pool::<T>() {
            Some(pool) => pool.get(entity),
            None => Err(not_found::<T>(entity)),
        }
    }

    /// Gets the entity's component of type `T` mutably.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidEntity`] if the entity was never created
    /// - [`RegistryError::ComponentNotFound`] if the entity lacks `T`
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> RegistryResult<&mut T> {
        self.check_entity(entity)?;
        match self.pool_mut::<T>() {
            Some(pool) => pool.get_mut(entity),
            None => Err(not_found::<T>(entity)),
        }
    }

    /// Removes the entity's component of type `T`.
    ///
    /// A no-op for unknown entities, never-used types and absent components.
    ///
    /// # Returns
    ///
    /// The removed value, if there was one.
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slots.get::<T>()?;
        let mask = self.masks.get_mut(entity.index())?;
        mask.remove(slot);

        self.pool_mut::<T>()?.remove(entity)
    }

    // =========================================================================
    // Singletons
    // =========================================================================

    /// Gets the singleton of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SingletonNotFound`] if none exists.
    #[inline]
    pub fn get_singleton<T: 'static>(&self) -> RegistryResult<&T> {
        self.singletons.get::<T>()
    }

    /// Gets the singleton of type `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SingletonNotFound`] if none exists.
    #[inline]
    pub fn get_singleton_mut<T: 'static>(&mut self) -> RegistryResult<&mut T> {
        self.singletons.get_mut::<T>()
    }

    /// Stores the singleton of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateSingleton`] if one already exists.
    #[inline]
    pub fn emplace_singleton<T: 'static>(&mut self, value: T) -> RegistryResult<&mut T> {
        self.singletons.emplace(value)
    }

    /// Checks if a singleton of type `T` exists.
    #[inline]
    #[must_use]
    pub fn has_singleton<T: 'static>(&self) -> bool {
        self.singletons.contains::<T>()
    }

    /// Removes the singleton of type `T`, returning it if it existed.
    #[inline]
    pub fn remove_singleton<T: 'static>(&mut self) -> Option<T> {
        self.singletons.remove::<T>()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Builds a view over every entity holding all component types in `Q`.
    ///
    /// `Q` is a tuple of 1 to 8 distinct component types. Missing pools are
    /// created, but only after every check has passed.
    ///
    /// The view borrows the registry mutably, so no component can be added
    /// or removed while it is alive.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyView`] if `Q` is `()`
    /// - [`RegistryError::DuplicateViewComponent`] if a type repeats
    /// - [`RegistryError::ComponentLimitExceeded`] if the new types in `Q`
    ///   do not fit in the remaining slots
    pub fn view<Q: ViewComponents>(&mut self) -> RegistryResult<View<'_, Q>> {
        let types = Q::component_types();
        if types.is_empty() {
            return Err(RegistryError::EmptyView);
        }
        for (position, component_type) in types.iter().enumerate() {
            if types[..position].contains(component_type) {
                return Err(RegistryError::DuplicateViewComponent(component_type.name()));
            }
        }

        let mut new_types = types
            .iter()
            .filter(|component_type| self.slots.get_by_id(component_type.id()).is_none());
        let free = MAX_COMPONENT_TYPES - self.slots.len();
        if let Some(overflow) = new_types.nth(free) {
            return Err(self.limit_exceeded(overflow.name()));
        }

        let mut slots = Vec::with_capacity(types.len());
        for component_type in &types {
            slots.push(self.register(*component_type)?);
        }

        let pools = Q::borrow_pools(disjoint_pools_mut(&mut self.pools, &slots)).map_err(
            |position| RegistryError::SlotTypeMismatch {
                slot: slots[position],
                component: types[position].name(),
            },
        )?;

        let view = View::new(pools);
        tracing::trace!(
            driver = self.slots.name(slots[view.driver()]).unwrap_or_default(),
            candidates = view.candidate_count(),
            "built component view"
        );
        Ok(view)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_entity(&self, entity: EntityId) -> RegistryResult<()> {
        if self.is_valid(entity) {
            Ok(())
        } else {
            Err(RegistryError::InvalidEntity {
                entity,
                entity_count: self.masks.len(),
            })
        }
    }

    fn limit_exceeded(&self, component: &'static str) -> RegistryError {
        tracing::warn!(
            component,
            registered = self.slots.len(),
            "component type limit reached"
        );
        RegistryError::ComponentLimitExceeded {
            component,
            limit: MAX_COMPONENT_TYPES,
        }
    }

    /// Resolves the slot of a type, creating its pool on first use.
    fn register(&mut self, component_type: ComponentType) -> RegistryResult<ComponentSlot> {
        if let Some(slot) = self.slots.get_by_id(component_type.id()) {
            return Ok(slot);
        }

        let slot = self
            .slots
            .assign(component_type)
            .ok_or_else(|| self.limit_exceeded(component_type.name()))?;
        self.pools.push(component_type.new_pool(self.config.pool_capacity));

        tracing::debug!(%slot, component = component_type.name(), "created component pool");
        Ok(slot)
    }

    fn pool_or_register<T: Component>(&mut self) -> RegistryResult<(ComponentSlot, &mut ComponentPool<T>)> {
        let slot = self.register(ComponentType::of::<T>())?;
        let pool = self
            .pools
            .get_mut(slot.index())
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<T>>())
            .ok_or(RegistryError::SlotTypeMismatch {
                slot,
                component: type_name::<T>(),
            })?;
        Ok((slot, pool))
    }

    fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        let slot = self.slots.get::<T>()?;
        self.pools
            .get_mut(slot.index())?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }

}

/// Id of the entity created after `count` others.
fn entity_at(count: usize) -> RegistryResult<EntityId> {
    u32::try_from(count)
        .ok()
        .filter(|_| count < Registry::MAX_ENTITIES)
        .map(EntityId::new)
        .ok_or(RegistryError::EntityLimitExceeded {
            limit: Registry::MAX_ENTITIES,
        })
}

/// Borrows the pools at `slots` mutably, in argument order.
///
/// `slots` must be distinct; a repeated slot is only borrowed once, so the
/// result would come up short.
fn disjoint_pools_mut<'p>(
    pools: &'p mut [Box<dyn ErasedPool>],
    slots: &[ComponentSlot],
) -> Vec<&'p mut dyn ErasedPool> {
    let mut found: Vec<Option<&mut dyn ErasedPool>> = slots.iter().map(|_| None).collect();
    for (index, pool) in pools.iter_mut().enumerate() {
        if let Some(position) = slots.iter().position(|slot| slot.index() == index) {
            found[position] = Some(&mut **pool);
        }
    }
    found.into_iter().flatten().collect()
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
