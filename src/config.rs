//! Configuration for the `rabbitry` binary.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `~/.rabbitry/config.toml` (or `--config`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Currency code shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where exported reports land when no output path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rabbitry")
}

fn default_database_path() -> PathBuf {
    config_dir().join("rabbitry.db")
}

fn default_currency() -> String {
    "XOF".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            currency: default_currency(),
            log_level: default_log_level(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".rabbitry").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path); missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Format an amount with the configured currency
    pub fn money(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();

        assert_eq!(config.currency, "XOF");
        assert_eq!(config.log_level, "warn");
        assert!(config.database_path.ends_with("rabbitry.db"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "database_path = \"/tmp/farm.db\"\ncurrency = \"EUR\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/farm.db"));
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.money(12.5), "12.50 EUR");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            export_dir: Some(dir.path().to_path_buf()),
            log_level: "debug".to_string(),
            ..Config::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "currency = [").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
