use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use taskdeck_core::SortKey;
use tracing::debug;

use crate::collection::CollectionOptions;

const CONFIG_DIR: &str = "taskdeck";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable that replaces `store.url`.
pub const ENV_API_URL: &str = "TASKDECK_API_URL";
/// Service address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

impl AppConfig {
    /// Load from `path`, or from the per-user config directory when `None`,
    /// then apply environment overrides.
    ///
    /// A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed, or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut fetch = |key: &'static str| env::var(key).ok();
        Self::load_with_env(path, &mut fetch)
    }

    fn load_with_env(
        path: Option<&Path>,
        fetch: &mut impl FnMut(&'static str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(fetch);
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/taskdeck/config.toml`, when the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from a file, returning defaults when it does not exist.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML or invalid values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, fetch: &mut impl FnMut(&'static str) -> Option<String>) {
        if let Some(url) = fetch(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            debug!(%url, "store url overridden from environment");
            self.store.url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        self.store.validate()?;
        if self.undo.window_secs == 0 {
            bail!("undo.window_secs must be greater than zero");
        }
        Ok(())
    }

    /// Options for a new [`crate::TaskCollection`].
    #[must_use]
    pub const fn collection_options(&self) -> CollectionOptions {
        CollectionOptions {
            sort_key: self.view.sort,
            undo_window: self.undo.window(),
        }
    }
}

/// Which persistence adapter backs the collection.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// REST service reached over HTTP.
    #[default]
    Http,
    /// Local JSON document.
    File,
    /// Process-local, discarded on exit.
    Memory,
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: Backend,
    pub url: String,
    pub path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Http,
            url: DEFAULT_API_URL.into(),
            path: PathBuf::from("db.json"),
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Request timeout for the HTTP adapter.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("store.timeout_secs must be greater than zero");
        }
        match self.backend {
            Backend::Http if self.url.trim().is_empty() => {
                Err(anyhow!("store.url must not be empty for the http backend"))
            }
            Backend::File if self.path.as_os_str().is_empty() => {
                Err(anyhow!("store.path must not be empty for the file backend"))
            }
            _ => Ok(()),
        }
    }
}

/// `[view]` block.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub sort: SortKey,
}

/// `[undo]` block.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UndoConfig {
    pub window_secs: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { window_secs: 5 }
    }
}

impl UndoConfig {
    /// Length of the undo window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
