//! # Registry Error Types
//!
//! All errors that can occur while storing, querying or viewing components.
//! Every one of them is recoverable and leaves the registry unchanged.

use thiserror::Error;

use crate::ecs::{ComponentSlot, EntityId};

/// Errors that can occur in the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The entity was never created by this registry.
    #[error("invalid entity {entity}: only {entity_count} entities exist")]
    InvalidEntity {
        /// The offending entity.
        entity: EntityId,
        /// Number of entities created so far.
        entity_count: usize,
    },

    /// Typed fetch on an entity lacking that component.
    #[error("entity {entity} has no `{component}` component")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: EntityId,
        /// Name of the missing component type.
        component: &'static str,
    },

    /// Every entity id has been handed out.
    #[error("entity limit reached: {limit} entities already created")]
    EntityLimitExceeded {
        /// Maximum number of entities.
        limit: usize,
    },

    /// Registering another component type would overflow the entity mask.
    #[error("component limit reached: cannot register `{component}`, {limit} types already tracked")]
    ComponentLimitExceeded {
        /// Name of the type that could not be registered.
        component: &'static str,
        /// Maximum number of component types.
        limit: usize,
    },

    /// No singleton of this type exists.
    #[error("singleton not found: {0}")]
    SingletonNotFound(&'static str),

    /// A singleton of this type already exists.
    #[error("singleton already exists: {0}")]
    DuplicateSingleton(&'static str),

    /// A view was requested without any component type.
    #[error("a view needs at least one component type")]
    EmptyView,

    /// A view named the same component type twice.
    #[error("component `{0}` appears more than once in a view")]
    DuplicateViewComponent(&'static str),

    /// The pool at a slot does not store the expected type.
    #[error("slot {slot} does not store `{component}`")]
    SlotTypeMismatch {
        /// The slot that was accessed.
        slot: ComponentSlot,
        /// Name of the expected component type.
        component: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
