//! Configuration types deserialized from `nandsim.toml`.

use serde::Deserialize;

/// The top-level simulator configuration.
///
/// Every section is optional; a missing section takes its defaults, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimConfig {
    /// Structural bounds enforced while resolving chip definitions.
    #[serde(default)]
    pub limits: ResolverLimits,
    /// Graph construction and evaluation settings.
    #[serde(default)]
    pub simulator: SimulatorSettings,
}

/// Bounds on chip interfaces and part counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverLimits {
    /// Maximum number of inputs, and separately of outputs, per chip.
    pub max_ios: usize,
    /// Smallest legal IO width in bits.
    pub min_io_width: u32,
    /// Largest legal IO width in bits.
    pub max_io_width: u32,
    /// Maximum number of parts per chip.
    pub max_parts: usize,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_ios: 80,
            min_io_width: 1,
            max_io_width: 1024,
            max_parts: 100,
        }
    }
}

/// Settings for graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Prefer an evaluation order that also respects edges out of sequential
    /// parts whenever that order exists.
    pub sequential_ordering_hints: bool,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            sequential_ordering_hints: true,
        }
    }
}
