//! Filter configuration

use crate::error::{OfflineError, Result};
use std::env;

/// Configuration for the offline cache filter, injected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Version-tagged cache namespace identifier. Distinct identifiers are
    /// disjoint storage buckets, so bumping it invalidates everything stored
    /// under the old one. Bump it whenever the manifest changes.
    pub cache_name: String,
    /// Ordered relative paths pre-cached at install time. `/` stays out of
    /// the manifest: the home page must never be served stale.
    pub precache_manifest: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: "trash-board-v2".to_string(),
            precache_manifest: vec!["/static/board/trash-icon.svg".to_string()],
        }
    }
}

impl WorkerConfig {
    /// Parse configuration from environment variables, falling back to the
    /// built-in defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cache_name = env::var("CACHE_NAME").unwrap_or(defaults.cache_name);

        let precache_manifest = env::var("PRECACHE_MANIFEST")
            .map(|s| parse_manifest(&s))
            .unwrap_or(defaults.precache_manifest);

        Self {
            cache_name,
            precache_manifest,
        }
    }

    /// Reject configurations that cannot address or fill a cache namespace.
    pub fn validate(&self) -> Result<()> {
        if self.cache_name.is_empty() {
            return Err(OfflineError::Config(
                "cache name must not be empty".to_string(),
            ));
        }
        for path in &self.precache_manifest {
            if !path.starts_with('/') {
                return Err(OfflineError::Config(format!(
                    "manifest entry must be a relative path starting with '/': {:?}",
                    path
                )));
            }
        }
        Ok(())
    }
}

/// Split a comma-separated manifest string, dropping empty segments.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.cache_name, "trash-board-v2");
        assert_eq!(
            config.precache_manifest,
            vec!["/static/board/trash-icon.svg".to_string()]
        );
    }

    #[test]
    fn test_default_manifest_excludes_home() {
        let config = WorkerConfig::default();
        assert!(!config.precache_manifest.iter().any(|p| p == "/"));
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = parse_manifest("/a.css, /b.js,,/c.svg ");
        assert_eq!(manifest, vec!["/a.css", "/b.js", "/c.svg"]);
    }

    #[test]
    fn test_validate_default() {
        assert!(WorkerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_cache_name() {
        let config = WorkerConfig {
            cache_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_absolute_manifest_entry() {
        let config = WorkerConfig {
            precache_manifest: vec!["https://cdn.example.com/icon.svg".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
