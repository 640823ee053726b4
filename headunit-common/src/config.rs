//! Bootstrap configuration loading
//!
//! The TOML file carries only bootstrap concerns (port, logging); everything
//! else about the player is runtime state that deliberately does not
//! persist. Resolution order for the file itself:
//!
//! 1. Explicit path (command-line argument)
//! 2. `$XDG_CONFIG_HOME/headunit/config.toml` (or the platform equivalent)
//! 3. `/etc/headunit/config.toml` (Linux)
//! 4. Built-in defaults when no file is found

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bootstrap configuration loaded from a TOML file
///
/// These settings cannot change while the service is running.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (stderr when not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_port() -> u16 {
    5750
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BootstrapConfig {
    /// Load configuration, falling back to built-in defaults when no file exists.
    ///
    /// An explicit path that cannot be read or parsed is an error; a missing
    /// default-location file is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        for candidate in default_config_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: BootstrapConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Candidate config file locations, in priority order
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("headunit").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/headunit/config.toml"));
    }
    paths
}
