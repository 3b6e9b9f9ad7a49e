use std::path::PathBuf;

use thiserror::Error;

use crate::api::toxicity::ToxicityError;

#[derive(Debug, Error)]
pub enum NetsimError {
    /// Transport failure talking to the admin API (connection refused, DNS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The admin API answered with a status other than the expected one
    #[error("Status code: {status}")]
    Status { status: u16, body: String },

    /// Toxicity or loss percentage outside its valid range
    #[error(transparent)]
    Toxicity(#[from] ToxicityError),

    /// The interrupt handler could not be installed
    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// A proxy name is required for every action except listing
    #[error("--proxy is required unless using --list")]
    MissingProxy,

    /// The configured admin API address is not a usable base URL
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// I/O errors from reading the configuration file
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for `FileConfig`
    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A convenient Result type alias using `NetsimError`.
pub type Result<T> = std::result::Result<T, NetsimError>;

impl NetsimError {
    /// Creates an unexpected-status error from the status code and response body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates an invalid URL error for the given address.
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for errors detected locally, before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Toxicity(_) | Self::MissingProxy)
    }
}
