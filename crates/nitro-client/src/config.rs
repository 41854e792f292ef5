//! # Configuration
//!
//! Service endpoints and client settings, loaded from disk.
//!
//! Both deployments of the account service share one flow; the host and the
//! cookie domain are the only things that differ, so they live here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the account service. Request paths are joined onto it.
    pub service_url: String,

    /// URL the `access_token` cookie is set against.
    pub cookie_url: String,

    /// `Domain` attribute of the `access_token` cookie.
    pub cookie_domain: String,

    /// `User-Agent` sent with every request.
    pub user_agent: String,

    /// File extension accepted for avatars, without the dot.
    pub avatar_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "https://services.fandom.com/".to_string(),
            cookie_url: "https://fandom.com".to_string(),
            cookie_domain: "fandom.com".to_string(),
            user_agent: format!(
                "nitro v{}: GIF avatars for everyone!",
                env!("CARGO_PKG_VERSION")
            ),
            avatar_extension: "gif".to_string(),
        }
    }
}

impl Config {
    /// Returns the default config file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nitro").join("config.json"))
    }

    /// Loads configuration from the default location, or returns defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Loads configuration from `path`, or returns defaults if it is missing
    /// or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Returns the service URL with a guaranteed trailing slash, so relative
    /// paths join below it instead of replacing its last segment.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.service_url.ends_with('/') {
            self.service_url.clone()
        } else {
            format!("{}/", self.service_url)
        }
    }

    /// Checks whether `path` carries the accepted avatar extension.
    #[must_use]
    pub fn accepts_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.avatar_extension))
    }
}
