//! Global eventual configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{EventualError, EventualResult};

/// Backend used when nothing overrides it in a release build.
static PROD_API_URL: &str = "https://eventual-backend-r8yc.onrender.com/api";
/// Development default (local backend).
static DEV_API_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "EVENTUAL_API_URL";

/// Global configuration at ~/.config/eventual/config.toml
///
/// Session state (token, user) is stored separately under the session
/// directory, not in this file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    /// Explicit API base URL. Takes precedence over the environment
    /// variable and the compiled default.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl GlobalConfig {
    pub fn config_path() -> EventualResult<PathBuf> {
        Ok(base_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is absent.
    pub fn load() -> EventualResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        toml::from_str(&contents).map_err(|e| {
            EventualError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Resolve the API base URL: config file, then environment, then the
    /// per-build default (development backend in debug builds).
    pub fn api_base_url(&self) -> String {
        let url = self
            .api_url
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| {
                if cfg!(debug_assertions) {
                    DEV_API_URL.to_string()
                } else {
                    PROD_API_URL.to_string()
                }
            });
        url.trim_end_matches('/').to_string()
    }
}

/// Root directory for eventual's own files.
pub fn base_dir() -> EventualResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| EventualError::Config("Could not determine config directory".into()))?;

    Ok(config_dir.join("eventual"))
}

/// Directory holding the persisted session pair.
pub fn session_dir() -> EventualResult<PathBuf> {
    Ok(base_dir()?.join("session"))
}
