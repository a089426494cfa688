//! Shared data model for the chip simulator.
//!
//! This crate holds the types every later stage agrees on:
//!
//! - [`Arena`] and the opaque [`BitId`] / [`NodeId`] handles used to share
//!   wire bits between nodes without reference counting.
//! - [`Primitive`], the closed registry of built-in chips with their static
//!   IO tables and state layout.
//! - [`ResolvedChipDefinition`], the validated output of the resolver.

#![warn(missing_docs)]

pub mod arena;
pub mod definition;
pub mod ids;
pub mod primitive;

pub use arena::{Arena, ArenaId};
pub use definition::{
    BitRange, Connection, Part, PinBinding, ResolvedChipDefinition, SignalBinding, SignalKind,
};
pub use ids::{BitId, NodeId};
pub use primitive::{PinSpec, Primitive};
