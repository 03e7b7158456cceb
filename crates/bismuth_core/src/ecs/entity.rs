//! # Entity Management
//!
//! Entities are plain indices handed out by a monotonic counter:
//! - The id is the entity's row in the registry's mask vector
//! - Ids are never recycled, so there is no generation counter
//!
//! Each entity owns one [`ComponentMask`] recording which component
//! slots it currently occupies.

use std::fmt;

use super::component::ComponentSlot;

/// Unique identifier for an entity.
///
/// Valid only for the registry that created it, and only for ids below
/// that registry's entity count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity ID from its raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this entity.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize`, ready for slice indexing.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Bitmask of the component slots an entity currently holds.
///
/// Bit `s` is set iff the pool for slot `s` stores a value for the entity.
/// The width of the mask caps the number of component types a registry can
/// track at [`ComponentMask::BITS`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// Number of addressable component slots.
    pub const BITS: usize = u64::BITS as usize;

    /// The empty mask.
    pub const EMPTY: Self = Self(0);

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Checks if the mask contains a slot.
    #[inline]
    #[must_use]
    pub const fn contains(self, slot: ComponentSlot) -> bool {
        (self.0 >> slot.index()) & 1 == 1
    }

    /// Sets the bit for a slot.
    #[inline]
    pub fn insert(&mut self, slot: ComponentSlot) {
        self.0 |= 1 << slot.index();
    }

    /// Clears the bit for a slot.
    #[inline]
    pub fn remove(&mut self, slot: ComponentSlot) {
        self.0 &= !(1 << slot.index());
    }

    /// Clears every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Returns true if no slot is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set slots.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the set slots, lowest first.
    #[inline]
    #[must_use]
    pub const fn iter(self) -> MaskIter {
        MaskIter { remaining: self.0 }
    }
}

impl IntoIterator for ComponentMask {
    type Item = ComponentSlot;
    type IntoIter = MaskIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the set slots of a [`ComponentMask`].
///
/// Uses `trailing_zeros` to jump straight to the next set bit.
#[derive(Clone, Debug)]
pub struct MaskIter {
    remaining: u64,
}

impl Iterator for MaskIter {
    type Item = ComponentSlot;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bit = u8::try_from(self.remaining.trailing_zeros()).ok()?;
        self.remaining &= self.remaining - 1;
        Some(ComponentSlot::new(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for MaskIter {}
