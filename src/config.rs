use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HOME_ENV, STREAM_PATH};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// API prefix every non-streaming call is relative to
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Absolute streaming endpoint; derived from `base_url` when unset
    #[serde(default)]
    pub(crate) stream_url: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Where the token and profile are kept
    #[serde(default)]
    pub(crate) storage_path: Option<PathBuf>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Explicit override: $LEGALQA_HOME/config.toml
        if let Some(home) = std::env::var_os(HOME_ENV) {
            paths.push(PathBuf::from(home).join("config.toml"));
        }

        // 2. XDG config: ~/.config/legalqa/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("legalqa").join("config.toml"));
        }

        // 3. Platform config dir (macOS Application Support)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("legalqa").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 4. Home directory: ~/.legalqa.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".legalqa.toml"));
        }

        paths
    }

    pub(crate) fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub(crate) fn stream_url(&self) -> String {
        match &self.stream_url {
            Some(url) => url.clone(),
            None => format!("{}{STREAM_PATH}", self.base_url()),
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
