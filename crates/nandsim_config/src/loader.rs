//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SimConfig;
use std::path::Path;

/// Name of the configuration file looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "nandsim.toml";

/// Loads and validates `nandsim.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<SimConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the limits describe a non-empty legal range.
fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    let limits = &config.limits;
    if limits.min_io_width == 0 {
        return Err(ConfigError::ValidationError(
            "limits.min_io_width must be at least 1".to_string(),
        ));
    }
    if limits.min_io_width > limits.max_io_width {
        return Err(ConfigError::ValidationError(format!(
            "limits.min_io_width ({}) exceeds limits.max_io_width ({})",
            limits.min_io_width, limits.max_io_width
        )));
    }
    if limits.max_ios == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_ios must be at least 1".to_string(),
        ));
    }
    if limits.max_parts == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_parts must be at least 1".to_string(),
        ));
    }
    Ok(())
}
