//! Clocked simulation of built chip circuits.
//!
//! [`Evaluator`] runs the clock protocol (set inputs, evaluate, apply,
//! commit) over one [`Circuit`](nandsim_graph::Circuit). Built-in chip
//! behaviour lives in a single dispatch over
//! [`Primitive`](nandsim_ir::Primitive).
//!
//! [`HardwareSimulator`] is the session a host drives: it owns the HDL
//! sources, loads a chip through the whole pipeline, and forwards clock
//! calls to the loaded chip's evaluator.

#![warn(missing_docs)]

pub mod error;
pub mod evaluator;
mod primitives;
pub mod session;

pub use error::SimError;
pub use evaluator::{Evaluator, Snapshot, Values};
pub use session::{ChipInterface, HardwareSimulator};
