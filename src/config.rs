use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use crate::error::NotazaError;

/// Conventional configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "notaza.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotazaConfig {
    /// Directory holding the page files.
    pub pages_dir: PathBuf,
    /// Page file extension, without the dot.
    pub extension: String,
    /// When false, refreshes report what they would change without saving.
    pub write: bool,
}

impl Default for NotazaConfig {
    fn default() -> Self {
        NotazaConfig {
            pages_dir: PathBuf::from("."),
            extension: "md".to_string(),
            write: true,
        }
    }
}

impl NotazaConfig {
    pub fn from_toml_str(content: &str) -> Result<NotazaConfig, NotazaError> {
        let config: NotazaConfig = toml::from_str(content)?;
        if config.extension.trim_start_matches('.').is_empty() {
            return Err(NotazaError::Config("extension must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Load a configuration file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<NotazaConfig, NotazaError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(NotazaConfig::default());
        }
        let content = read_to_string(path)?;
        NotazaConfig::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, NotazaError> {
        toml::to_string(self).map_err(|e| NotazaError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_log::test;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = NotazaConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, NotazaConfig::default());
        assert!(config.write);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = NotazaConfig::from_toml_str("pages_dir = \"notes\"\nwrite = false\n").unwrap();
        assert_eq!(config.pages_dir, PathBuf::from("notes"));
        assert_eq!(config.extension, "md");
        assert!(!config.write);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = NotazaConfig::from_toml_str("pagesdir = \"x\"").unwrap_err();
        assert!(matches!(err, NotazaError::Config(_)));
    }

    #[test]
    fn empty_extension_is_rejected() {
        assert!(NotazaConfig::from_toml_str("extension = \"\"").is_err());
    }

    #[test]
    fn written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = NotazaConfig {
            pages_dir: PathBuf::from("pages"),
            extension: "markdown".to_string(),
            write: false,
        };
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(NotazaConfig::load(&path).unwrap(), config);
    }
}
