//! Parsing and validation of `nandsim.toml` simulator configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`SimConfig`]: the structural limits the resolver enforces
//! and the settings the graph builder honours.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
