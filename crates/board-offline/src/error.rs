//! Error types for the offline cache filter

use std::fmt;

#[derive(Debug)]
pub enum OfflineError {
    /// A manifest entry could not be fetched during the install-time fill.
    Precache { path: String, reason: String },
    Cache(response_cache::CacheError),
    /// Transport-level network failure.
    Network(String),
    /// A navigation failed on the network and had no cached fallback.
    Offline { url: String },
    Config(String),
}

impl fmt::Display for OfflineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfflineError::Precache { path, reason } => {
                write!(f, "Pre-cache fill failed for {}: {}", path, reason)
            }
            OfflineError::Cache(err) => write!(f, "Cache error: {}", err),
            OfflineError::Network(msg) => write!(f, "Network error: {}", msg),
            OfflineError::Offline { url } => {
                write!(f, "Offline with no cached fallback for {}", url)
            }
            OfflineError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for OfflineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OfflineError::Cache(err) => Some(err),
            _ => None,
        }
    }
}

impl From<response_cache::CacheError> for OfflineError {
    fn from(err: response_cache::CacheError) -> Self {
        OfflineError::Cache(err)
    }
}

impl From<reqwest::Error> for OfflineError {
    fn from(err: reqwest::Error) -> Self {
        OfflineError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OfflineError>;
