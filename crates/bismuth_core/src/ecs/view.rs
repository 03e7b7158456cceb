//! # Component Views
//!
//! Iterate every entity that holds all of a set of component types.
//!
//! ## Algorithm
//!
//! ```text
//! Position: [e1, e2, e3, e4, e5, e6]     <- 6 entries
//! Velocity: [e2, e5]                     <- 2 entries, drives the walk
//!
//! for e in Velocity.entities:            O(smallest pool)
//!     Position.locations[e] != INVALID?  O(1) per other pool
//! ```
//!
//! The driving pool is the one with the fewest entries (ties go to the
//! earliest type in the tuple). Cost is linear in the smallest pool, not in
//! the number of entities.
//!
//! ## Mutation
//!
//! A [`View`] mutably borrows the registry it came from. Adding or removing
//! components of any type while the view is alive is a compile error, so a
//! swap-remove can never move an element under the cursor. Component
//! *values* can still be changed through [`View::for_each_mut`] and
//! [`View::get_mut`].

use super::component::{Component, ComponentType};
use super::entity::EntityId;
use super::storage::{ComponentPool, ErasedPool};

/// A tuple of component types a [`View`] can iterate.
///
/// Implemented for tuples of 1 to 8 component types. Also implemented for
/// `()` so that an empty view is rejected at runtime with
/// [`RegistryError::EmptyView`](crate::RegistryError::EmptyView).
pub trait ViewComponents: 'static {
    /// Mutable borrows of every participating pool.
    type Pools<'w>;
    /// Shared references to one entity's components.
    type Refs<'p>;
    /// Mutable references to one entity's components.
    type Muts<'p>;

    /// Describes every type in the tuple, in order.
    fn component_types() -> Vec<ComponentType>;

    /// Downcasts type-erased pools (in tuple order) to their concrete types.
    ///
    /// # Errors
    ///
    /// Returns the tuple position of the first pool that is missing or of
    /// the wrong type.
    fn borrow_pools(pools: Vec<&mut dyn ErasedPool>) -> Result<Self::Pools<'_>, usize>;

    /// Number of entries in each pool, in tuple order.
    fn pool_lens(pools: &Self::Pools<'_>) -> Vec<usize>;

    /// Dense owner array of the pool at `position`.
    fn dense_entities<'p>(pools: &'p Self::Pools<'_>, position: usize) -> &'p [EntityId];

    /// Fetches the entity's components if it is present in every pool.
    fn fetch<'p>(pools: &'p Self::Pools<'_>, entity: EntityId) -> Option<Self::Refs<'p>>;

    /// Fetches the entity's components mutably if it is present in every pool.
    fn fetch_mut<'p>(pools: &'p mut Self::Pools<'_>, entity: EntityId) -> Option<Self::Muts<'p>>;
}

impl ViewComponents for () {
    type Pools<'w> = ();
    type Refs<'p> = ();
    type Muts<'p> = ();

    fn component_types() -> Vec<ComponentType> {
        Vec::new()
    }

    fn borrow_pools(_pools: Vec<&mut dyn ErasedPool>) -> Result<Self::Pools<'_>, usize> {
        Ok(())
    }

    fn pool_lens(_pools: &Self::Pools<'_>) -> Vec<usize> {
        Vec::new()
    }

    fn dense_entities<'p>(_pools: &'p Self::Pools<'_>, _position: usize) -> &'p [EntityId] {
        &[]
    }

    fn fetch<'p>(_pools: &'p Self::Pools<'_>, _entity: EntityId) -> Option<Self::Refs<'p>> {
        Some(())
    }

    fn fetch_mut<'p>(_pools: &'p mut Self::Pools<'_>, _entity: EntityId) -> Option<Self::Muts<'p>> {
        Some(())
    }
}

macro_rules! impl_view_components {
    ($($name:ident . $index:tt),+) => {
        impl<$($name: Component),+> ViewComponents for ($($name,)+) {
            type Pools<'w> = ($(&'w mut ComponentPool<$name>,)+);
            type Refs<'p> = ($(&'p $name,)+);
            type Muts<'p> = ($(&'p mut $name,)+);

            fn component_types() -> Vec<ComponentType> {
                vec![$(ComponentType::of::<$name>()),+]
            }

            fn borrow_pools(pools: Vec<&mut dyn ErasedPool>) -> Result<Self::Pools<'_>, usize> {
                let mut pools = pools.into_iter();
                Ok(($(
                    pools
                        .next()
                        .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<$name>>())
                        .ok_or($index as usize)?,
                )+))
            }

            fn pool_lens(pools: &Self::Pools<'_>) -> Vec<usize> {
                vec![$(pools.$index.len()),+]
            }

            fn dense_entities<'p>(pools: &'p Self::Pools<'_>, position: usize) -> &'p [EntityId] {
                match position {
                    $($index => pools.$index.entities(),)+
                    _ => &[],
                }
            }

            fn fetch<'p>(pools: &'p Self::Pools<'_>, entity: EntityId) -> Option<Self::Refs<'p>> {
                Some(($(pools.$index.find(entity)?,)+))
            }

            fn fetch_mut<'p>(pools: &'p mut Self::Pools<'_>, entity: EntityId) -> Option<Self::Muts<'p>> {
                Some(($(pools.$index.find_mut(entity)?,)+))
            }
        }
    };
}

impl_view_components!(A.0);
impl_view_components!(A.0, B.1);
impl_view_components!(A.0, B.1, C.2);
impl_view_components!(A.0, B.1, C.2, D.3);
impl_view_components!(A.0, B.1, C.2, D.3, E.4);
impl_view_components!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_view_components!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_view_components!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);

/// Iteration facade over the intersection of several component pools.
///
/// Built by [`Registry::view`](crate::Registry::view). Yields
/// `(entity, (&T1, &T2, ...))` for every entity holding all the types.
/// Order follows the driving pool's dense order and is otherwise
/// unspecified.
pub struct View<'w, Q: ViewComponents> {
    pools: Q::Pools<'w>,
    /// Position (in `Q`) of the pool that drives iteration.
    driver: usize,
}

impl<'w, Q: ViewComponents> View<'w, Q> {
    /// Wraps borrowed pools, picking the smallest one as the driver.
    pub(crate) fn new(pools: Q::Pools<'w>) -> Self {
        let driver = Q::pool_lens(&pools)
            .iter()
            .enumerate()
            .min_by_key(|&(_, &len)| len)
            .map_or(0, |(position, _)| position);

        Self { pools, driver }
    }

    /// Position (in the type tuple) of the pool driving iteration.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> usize {
        self.driver
    }

    /// Number of entities the view will test: the size of the driving pool.
    ///
    /// An upper bound on the number of items yielded.
    #[inline]
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.driver_entities().len()
    }

    /// Checks if the entity holds every component type of the view.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        Q::fetch(&self.pools, entity).is_some()
    }

    /// Gets the entity's components, or `None` if it lacks any of them.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<Q::Refs<'_>> {
        Q::fetch(&self.pools, entity)
    }

    /// Gets the entity's components mutably, or `None` if it lacks any of them.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<Q::Muts<'_>> {
        Q::fetch_mut(&mut self.pools, entity)
    }

    /// Iterates over `(entity, components)` for every matching entity.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> ViewIter<'_, 'w, Q> {
        ViewIter {
            pools: &self.pools,
            entities: self.driver_entities().iter(),
        }
    }

    /// Calls `f` with mutable access to every matching entity's components.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(EntityId, Q::Muts<'_>),
    {
        for index in 0..self.candidate_count() {
            let entity = self.driver_entities()[index];
            if let Some(components) = Q::fetch_mut(&mut self.pools, entity) {
                f(entity, components);
            }
        }
    }

    /// Counts the matching entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn driver_entities(&self) -> &[EntityId] {
        Q::dense_entities(&self.pools, self.driver)
    }
}

impl<'v, 'w, Q: ViewComponents> IntoIterator for &'v View<'w, Q> {
    type Item = (EntityId, Q::Refs<'v>);
    type IntoIter = ViewIter<'v, 'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the matching entities of a [`View`].
pub struct ViewIter<'v, 'w, Q: ViewComponents> {
    pools: &'v Q::Pools<'w>,
    entities: std::slice::Iter<'v, EntityId>,
}

impl<'v, Q: ViewComponents> Iterator for ViewIter<'v, '_, Q> {
    type Item = (EntityId, Q::Refs<'v>);

    fn next(&mut self) -> Option<Self::Item> {
        let pools = self.pools;
        self.entities
            .by_ref()
            .find_map(|&entity| Q::fetch(pools, entity).map(|components| (entity, components)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.len()))
    }
}
