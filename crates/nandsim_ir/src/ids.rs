//! Opaque ID newtypes for simulator entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.
//! IDs are created by [`Arena::alloc`](crate::arena::Arena::alloc) and used for O(1) lookup.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Handle to one boolean cell in a circuit's shared bit buffer.
    ///
    /// Pins and signals are sequences of `BitId`s; two pins that hold the
    /// same `BitId` observe the same wire.
    BitId
);

define_id!(
    /// Position of a node within its graph level.
    NodeId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = BitId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality_and_order() {
        let a = NodeId::from_raw(7);
        let b = NodeId::from_raw(7);
        let c = NodeId::from_raw(8);
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(BitId::from_raw(1));
        set.insert(BitId::from_raw(2));
        set.insert(BitId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = BitId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: BitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
