//! Errors surfaced by the simulator session.

use nandsim_config::ConfigError;
use nandsim_graph::GraphError;
use nandsim_resolve::ResolveError;

/// Errors that can occur while loading a chip into a session.
///
/// Stage errors are wrapped transparently so their messages reach the host
/// unchanged. Simulation itself never fails once a chip is loaded.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The top-level chip has no source text.
    #[error("Chip '{0}' not found")]
    ChipNotFound(String),

    /// A simulation call was made before any chip was loaded.
    #[error("no chip loaded")]
    NoChipLoaded,

    /// Parsing or semantic resolution failed, for the top-level chip or
    /// any chip it uses.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The simulator configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
