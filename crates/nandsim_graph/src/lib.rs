//! Executable circuit graphs.
//!
//! [`GraphBuilder`] turns a resolved chip and its dependencies into a
//! [`Circuit`]: a tree of [`Graph`] levels whose nodes share wire bits
//! through one arena. Each level is stored in evaluation order, and
//! sequential built-ins carry their clocked [`SequentialState`].

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod state;

pub use builder::{build_circuit, GraphBuilder};
pub use error::GraphError;
pub use graph::{Circuit, Graph, Node, PinMap};
pub use state::SequentialState;
