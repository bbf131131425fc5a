use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{DEFAULT_GATEWAY_URL, DEFAULT_LANG};

const CONFIG_FILE: &str = "config.yaml";

/// Gateway connection settings, loaded from `~/.cirrus-store/config.yaml`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Bearer token sent with every gateway request when present
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_gateway_url() -> String {
    String::from(DEFAULT_GATEWAY_URL)
}

fn default_lang() -> String {
    String::from(DEFAULT_LANG)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gateway_url: default_gateway_url(),
            token: None,
            lang: default_lang(),
        }
    }
}

impl Config {
    /// Load from the default config directory, falling back to defaults
    /// when the file is missing or unreadable
    pub fn load() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cirrus-store");
        Self::load_from(&dir)
    }

    pub fn load_from(config_dir: &std::path::Path) -> Self {
        let path = config_dir.join(CONFIG_FILE);
        fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_yaml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Write the config back out, creating the directory if needed
    #[allow(dead_code)] // Used by a future `login` flow
    pub fn save_to(&self, config_dir: &std::path::Path) -> Result<()> {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(config_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path());
        assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.lang, "en");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            gateway_url: "https://cloud.example.org".into(),
            token: Some("secret".into()),
            lang: "fr".into(),
        };
        config.save_to(dir.path()).unwrap();

        let loaded = Config::load_from(dir.path());
        assert_eq!(loaded.gateway_url, "https://cloud.example.org");
        assert_eq!(loaded.token.as_deref(), Some("secret"));
        assert_eq!(loaded.lang, "fr");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "gateway_url: https://cloud.example.org\n",
        )
        .unwrap();

        let loaded = Config::load_from(dir.path());
        assert_eq!(loaded.gateway_url, "https://cloud.example.org");
        assert_eq!(loaded.lang, "en");
    }
}
