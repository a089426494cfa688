//! Semantic resolution of parsed chip definitions.
//!
//! Resolution turns a [`ParsedChipDefinition`](nandsim_hdl::ParsedChipDefinition)
//! into a [`ResolvedChipDefinition`](nandsim_ir::ResolvedChipDefinition):
//! every pin and signal range is concrete and width-checked, every signal is
//! classified, and every custom chip the definition uses is resolved from
//! the [`SourceMap`] exactly once.
//!
//! Use [`resolve_chip`] for a top-level load, or drive a [`Resolver`]
//! directly to share memoized definitions across several loads.

#![warn(missing_docs)]

pub mod coverage;
pub mod error;
pub mod resolver;

use std::collections::HashMap;

pub use error::{ResolutionError, ResolveError};
pub use resolver::{resolve_chip, source_map, Resolved, Resolver};

/// HDL source text keyed by chip name.
pub type SourceMap = HashMap<String, String>;
