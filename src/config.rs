//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file. Every field has a default, so a
//! missing file (or a missing table) is the same as an empty one.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::storage::DEFAULT_INDENT;

/// Application name used for the platform config/data directories
pub const APP_NAME: &str = "project-tracker";

/// File name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// File name of the store inside the data directory
pub const STORE_FILE: &str = "store.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Backing store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Backing store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON store (defaults to the platform data directory)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Indent width used when writing the store
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            indent: default_indent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Placeholder printed for absent values and dangling references
    #[serde(default = "default_none_marker")]
    pub none_marker: String,
}

fn default_none_marker() -> String {
    "-".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            none_marker: default_none_marker(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path, or from the platform config directory
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load_or_default(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Pick the store path: explicit override, then config, then the
    /// platform data directory, then `./data/store.json`
    pub fn store_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = &self.store.path {
            return path.clone();
        }
        default_store_path()
    }

    fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=8).contains(&self.indent) {
            return Err(Error::InvalidConfig(format!(
                "store.indent must be between 1 and 8, got {}",
                self.indent
            )));
        }
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.none_marker.is_empty() {
            return Err(Error::InvalidConfig(
                "output.none_marker cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Default location of the config file, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Default location of the store
pub fn default_store_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(STORE_FILE))
        .unwrap_or_else(|| PathBuf::from("data").join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let config = Config::default();
        assert_eq!(config.store.path, None);
        assert_eq!(config.store.indent, 2);
        assert_eq!(config.output.none_marker, "-");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[store]
path = "/tmp/tracker/store.json"
indent = 4

[output]
none_marker = "n/a"
"#,
        )
        .expect("write config");

        let config = Config::load(&path).expect("load");
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/tmp/tracker/store.json"))
        );
        assert_eq!(config.store.indent, 4);
        assert_eq!(config.output.none_marker, "n/a");
    }

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[output]\nnone_marker = \"?\"\n").expect("write config");

        let config = Config::load(&path).expect("load");
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.output.none_marker, "?");
    }

    #[test]
    fn invalid_indent_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[store]\nindent = 0\n").expect("write config");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn empty_none_marker_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[output]\nnone_marker = \"\"\n").expect("write config");

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_or_default(&dir.path().join(CONFIG_FILE)).expect("load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn store_path_prefers_explicit_then_config() {
        let mut config = Config::default();
        config.store.path = Some(PathBuf::from("from-config.json"));

        assert_eq!(
            config.store_path(Some(Path::new("explicit.json"))),
            PathBuf::from("explicit.json")
        );
        assert_eq!(config.store_path(None), PathBuf::from("from-config.json"));
    }
}
