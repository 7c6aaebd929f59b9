use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::CoreError;
use crate::models::SelectedConfig;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Public Contentful GraphQL endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graphql.contentful.com";

/// Quiet period after the last credential keystroke before fetching.
pub const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Top-level application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    /// Host config used in place of a live host in development mode.
    #[serde(default)]
    pub fixture: Option<SelectedConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettings {
    #[serde(default)]
    pub mode: RunMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub base_url: String,
    pub debounce_ms: u64,
    pub stale_response_policy: StaleResponsePolicy,
}

impl FetchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stale_response_policy: StaleResponsePolicy::default(),
        }
    }
}

/// Whether the app talks to a real host or runs against a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

/// How fetch completions that arrive out of order are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Every completion is applied as it arrives, so a slow older request
    /// can overwrite the result of a newer one.
    #[default]
    LastResolvedWins,
    /// Completions for anything but the newest issued request are dropped.
    LastRequestedWins,
}

/// Where the initial host configuration comes from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Handshake with the surrounding host.
    Live,
    /// A local, fully typed stand-in for the host's config.
    Fixture(SelectedConfig),
}

impl AppSettings {
    /// Load settings: user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load settings from an explicit file. Sections missing from the file
    /// fall back to their defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading settings");
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CoreError> {
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "contentful-app")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Resolve the startup config source for `mode`.
    ///
    /// Development mode prefers `fixture_override`, then the `[fixture]`
    /// table, then an empty config.
    pub fn config_source(
        &self,
        mode: RunMode,
        fixture_override: Option<SelectedConfig>,
    ) -> ConfigSource {
        match mode {
            RunMode::Production => ConfigSource::Live,
            RunMode::Development => ConfigSource::Fixture(
                fixture_override
                    .or_else(|| self.fixture.clone())
                    .unwrap_or_default(),
            ),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
