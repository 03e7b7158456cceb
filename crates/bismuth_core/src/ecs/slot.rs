//! # Component Slot Assignment
//!
//! Maps component types to small integer slots. Each registry owns its own
//! table, so assignment only depends on the order in which that registry
//! first sees each type.

use std::any::TypeId;
use std::collections::HashMap;

use super::component::{Component, ComponentSlot, ComponentType, MAX_COMPONENT_TYPES};

/// Per-registry `TypeId -> ComponentSlot` table.
///
/// Slots are handed out monotonically starting at 0 and never change for
/// the lifetime of the table.
#[derive(Debug, Default)]
pub struct SlotTable {
    /// Slot of every registered type.
    slots: HashMap<TypeId, ComponentSlot>,
    /// Registered types, indexed by slot.
    types: Vec<ComponentType>,
}

impl SlotTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot of `T`, if it has one.
    #[inline]
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<ComponentSlot> {
        self.get_by_id(TypeId::of::<T>())
    }

    /// Returns the slot of the type with the given `TypeId`, if it has one.
    #[inline]
    #[must_use]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<ComponentSlot> {
        self.slots.get(&type_id).copied()
    }

    /// Returns the slot of `component_type`, assigning the next free one on
    /// first use.
    ///
    /// # Returns
    ///
    /// `None` if the type is new and all [`MAX_COMPONENT_TYPES`] slots are
    /// taken. The table is left unchanged in that case.
    pub fn assign(&mut self, component_type: ComponentType) -> Option<ComponentSlot> {
        if let Some(slot) = self.get_by_id(component_type.id()) {
            return Some(slot);
        }
        if self.is_full() {
            return None;
        }

        let slot = ComponentSlot::new(u8::try_from(self.types.len()).ok()?);
        self.slots.insert(component_type.id(), slot);
        self.types.push(component_type);
        Some(slot)
    }

    /// Returns the type registered at `slot`.
    #[inline]
    #[must_use]
    pub fn component_type(&self, slot: ComponentSlot) -> Option<&ComponentType> {
        self.types.get(slot.index())
    }

    /// Returns the name of the type registered at `slot`.
    #[inline]
    #[must_use]
    pub fn name(&self, slot: ComponentSlot) -> Option<&'static str> {
        self.component_type(slot).map(ComponentType::name)
    }

    /// Number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns true if every slot is taken.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.types.len() >= MAX_COMPONENT_TYPES
    }
}
