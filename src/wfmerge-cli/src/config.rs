//! Configuration management for wfmerge

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Data directory used when neither a flag nor the config names one.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Output file name inside the data directory.
pub const DEFAULT_OUTPUT_FILE: &str = "merged_warframe.json";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("wfmerge");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Data directory: explicit flag, then config, then `./data`.
    pub fn data_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Output file: explicit flag, then config, then inside `data_dir`.
    pub fn output(&self, flag: Option<&Path>, data_dir: &Path) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| data_dir.join(DEFAULT_OUTPUT_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("wfmerge").join("config.toml");

        let config = Config {
            data_dir: Some(PathBuf::from("/srv/wf")),
            output: None,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "data_dir = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolution_order() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/wf")),
            output: None,
        };
        assert_eq!(config.data_dir(None), PathBuf::from("/srv/wf"));
        assert_eq!(config.data_dir(Some(Path::new("here"))), PathBuf::from("here"));
        assert_eq!(
            config.output(None, Path::new("/srv/wf")),
            PathBuf::from("/srv/wf/merged_warframe.json")
        );

        let empty = Config::default();
        assert_eq!(empty.data_dir(None), PathBuf::from("data"));
        assert_eq!(
            empty.output(Some(Path::new("out.json")), Path::new("data")),
            PathBuf::from("out.json")
        );
    }

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }
}
