// Configuration management for Lucy Radio
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::state::TesterPolicy;
use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub stations_path: PathBuf,
    pub system_user: String, // credited for auto-picked tracks when nobody started the loop
    pub log_dir: PathBuf,
    #[serde(default)]
    pub tester: TesterConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TesterConfig {
    pub default_policy: TesterPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let base = Self::base_dir();

        Self {
            stations_path: base.join("stations.json"),
            system_user: "lucy-radio".to_string(),
            log_dir: base.join("logs"),
            tester: TesterConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("lucy-radio");

        Ok(config_dir.join("config.toml"))
    }

    fn base_dir() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lucy-radio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());

        // second load reads back what was written
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
stations_path = "/srv/lucy/stations.json"
system_user = "1234567890"
log_dir = "/var/log/lucy"

[tester]
default_policy = "everytime"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.stations_path, PathBuf::from("/srv/lucy/stations.json"));
        assert_eq!(config.system_user, "1234567890");
        assert_eq!(config.tester.default_policy, TesterPolicy::Everytime);
    }

    #[test]
    fn test_tester_table_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "stations_path = \"s.json\"\nsystem_user = \"bot\"\nlog_dir = \"logs\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tester.default_policy, TesterPolicy::Songend);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "stations_path = 12").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
