//! Client configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then command-line flags (or their environment variables).
//!
//! ```toml
//! # ~/.config/netsim/config.toml
//! api_url = "http://toxiproxy.internal:8474"
//! timeout_secs = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::error::{NetsimError, Result};

/// Address of a Toxiproxy admin API running with its default settings.
pub const DEFAULT_API_URL: &str = "http://localhost:8474";

/// Resolved settings handed to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the admin API
    pub api_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Layers file values and then flag values over the defaults.
    pub fn resolve(file: FileConfig, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: api_url.or(file.api_url).unwrap_or(defaults.api_url),
            timeout: timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .or(defaults.timeout),
        }
    }
}

/// Contents of the TOML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NetsimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| NetsimError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<config dir>/netsim/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("netsim").join("config.toml"))
    }

    /// Finds the configuration to use.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// read if present and an empty configuration is used otherwise.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}
