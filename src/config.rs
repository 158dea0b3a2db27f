//! Search configuration, read from TOML.
//!
//! ```toml
//! [index]
//! dependency-dirs = [".spago", "bower_components"]
//! package-prefix = "purescript-"
//! builtin-module = "Prim"
//!
//! [engine]
//! max-results = 50
//! ```

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DOCS_SEARCH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    pub index: IndexConfig,
    pub engine: EngineConfig,
}

/// How the index builder recovers package and builtin information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexConfig {
    /// First path segments marking a dependency checkout; the package name follows.
    pub dependency_dirs: Vec<String>,
    /// Prefix stripped from package directory and manifest names.
    pub package_prefix: String,
    /// Root module of compiler-provided declarations.
    pub builtin_module: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dependency_dirs: vec![".spago".to_string(), "bower_components".to_string()],
            package_prefix: "purescript-".to_string(),
            builtin_module: "Prim".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Truncate each response to this many results. Unlimited when unset.
    pub max_results: Option<usize>,
}

impl SearchConfig {
    /// Reads a config file. `~` is expanded to the home directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let expanded = expand_tilde(&path.to_string_lossy()).into_owned();
        let content = std::fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file {}", expanded))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", expanded))?;

        tracing::debug!(path = %expanded, ?config, "Loaded search config");
        Ok(config)
    }

    /// Loads `$DOCS_SEARCH_CONFIG` if set, else `<config dir>/docs-search/config.toml`
    /// if it exists, else the defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(PathBuf::from(path));
        }

        if let Some(path) = default_path()
            && path.is_file()
        {
            return Self::load(path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docs-search").join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
