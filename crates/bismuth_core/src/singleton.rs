//! # Singleton Store
//!
//! At most one value per type, independent of entities. Used for
//! cross-cutting state such as clocks, settings or input snapshots.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{RegistryError, RegistryResult};

/// Type-keyed store holding at most one instance per type.
///
/// Values are created explicitly with [`SingletonStore::emplace`] and never
/// constructed implicitly.
#[derive(Debug, Default)]
pub struct SingletonStore {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl SingletonStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the singleton of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SingletonNotFound`] if none exists.
    pub fn get<T: 'static>(&self) -> RegistryResult<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or(RegistryError::SingletonNotFound(type_name::<T>()))
    }

    /// Gets the singleton of type `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SingletonNotFound`] if none exists.
    pub fn get_mut<T: 'static>(&mut self) -> RegistryResult<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
            .ok_or(RegistryError::SingletonNotFound(type_name::<T>()))
    }

    /// Stores the singleton of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateSingleton`] if one already exists.
    /// The existing value is kept.
    pub fn emplace<T: 'static>(&mut self, value: T) -> RegistryResult<&mut T> {
        match self.values.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => {
                tracing::warn!(singleton = type_name::<T>(), "singleton already exists");
                Err(RegistryError::DuplicateSingleton(type_name::<T>()))
            }
            Entry::Vacant(slot) => slot
                .insert(Box::new(value))
                .downcast_mut::<T>()
                .ok_or(RegistryError::SingletonNotFound(type_name::<T>())),
        }
    }

    /// Checks if a singleton of type `T` exists.
    #[inline]
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Removes the singleton of type `T`.
    ///
    /// Removing an absent singleton is a no-op.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if there was none.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Number of stored singletons.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no singleton is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
