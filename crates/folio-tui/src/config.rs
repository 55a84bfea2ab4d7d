//! Application configuration
//!
//! Configuration loaded from a `folio.toml` file, searched in the current
//! working directory first and the platform config directory second.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which store backend the comment widget talks to, selected at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory mock, for local development. Not persisted.
    #[default]
    Memory,
    /// Remote document store.
    Rest { base_url: String, collection: String },
}

/// Application configuration loaded from folio.toml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// GitHub account whose public repositories the repositories page
    /// lists.
    #[serde(default = "default_github_user")]
    pub github_user: String,

    /// Where the site is "served" from; drives the navigation resolver.
    #[serde(default)]
    pub site_url: Option<String>,

    /// Checkout directory name marking the site root for file:// locations.
    #[serde(default = "default_site_dir")]
    pub site_dir: String,

    /// Comment store backend.
    #[serde(default)]
    pub backend: BackendConfig,
}

fn default_github_user() -> String {
    "chrriedel".to_string()
}

fn default_site_dir() -> String {
    "chrriedel.github.io".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_user: default_github_user(),
            site_url: None,
            site_dir: default_site_dir(),
            backend: BackendConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use
    /// defaults.
    pub fn load() -> Self {
        for path in Self::search_paths() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }
        log::debug!("Using default app config");
        Self::default()
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("folio.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("folio").join("folio.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.github_user, "chrriedel");
        assert_eq!(config.backend, BackendConfig::Memory);
        assert_eq!(config.site_url, None);
    }

    #[test]
    fn test_config_deserialize_rest_backend() {
        let toml = r#"
            github_user = "octocat"
            site_url = "https://octocat.github.io/folio/index.html"

            [backend]
            type = "rest"
            base_url = "https://comments.example.com"
            collection = "comments"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.github_user, "octocat");
        assert_eq!(
            config.backend,
            BackendConfig::Rest {
                base_url: "https://comments.example.com".to_string(),
                collection: "comments".to_string(),
            }
        );
        // site_dir falls back to its default.
        assert_eq!(config.site_dir, "chrriedel.github.io");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
