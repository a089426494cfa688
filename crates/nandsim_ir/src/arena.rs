//! Generic arena for dense, ID-indexed storage.
//!
//! The simulator keeps every wire bit of a circuit in one [`Arena`] of
//! `bool`s addressed by [`BitId`](crate::ids::BitId). Nodes never own bits;
//! they hold IDs, so any number of readers can share one writer's bit.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque ID types used as arena keys.
///
/// Implementors must provide a bijection between `u32` indices and the ID type.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, append-only container indexed by opaque IDs.
///
/// IDs are stable for the lifetime of the arena because items are never
/// reordered or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Allocates a new item and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns a reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated by this arena.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated by this arena.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns the number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<I: ArenaId, T: Copy> Arena<I, T> {
    /// Copies the items behind `ids`, in order, into a new vector.
    pub fn read_all(&self, ids: &[I]) -> Vec<T> {
        ids.iter().map(|&id| *self.get(id)).collect()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::BitId;

    #[test]
    fn alloc_and_index() {
        let mut bits: Arena<BitId, bool> = Arena::new();
        let a = bits.alloc(false);
        let b = bits.alloc(true);
        assert!(!bits[a]);
        assert!(bits[b]);
        assert_eq!(bits.len(), 2);
    }

    #[test]
    fn index_mut_writes_through() {
        let mut bits: Arena<BitId, bool> = Arena::with_capacity(4);
        let id = bits.alloc(false);
        bits[id] = true;
        assert!(*bits.get(id));
    }

    #[test]
    fn read_all_follows_id_order() {
        let mut bits: Arena<BitId, bool> = Arena::new();
        let lo = bits.alloc(true);
        let hi = bits.alloc(false);
        assert_eq!(bits.read_all(&[hi, lo, lo]), vec![false, true, true]);
    }

    #[test]
    fn alloc_ids_are_sequential() {
        let mut arena: Arena<BitId, u8> = Arena::new();
        let first = arena.alloc(10);
        let second = arena.alloc(20);
        assert_eq!((first.as_raw(), second.as_raw()), (0, 1));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn default_is_empty() {
        let arena: Arena<BitId, bool> = Arena::default();
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let mut arena: Arena<BitId, bool> = Arena::new();
        arena.alloc(true);
        arena.alloc(false);
        let json = serde_json::to_string(&arena).unwrap();
        let restored: Arena<BitId, bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored[BitId::from_raw(0)]);
    }
}
