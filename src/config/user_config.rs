//! User-level configuration for dataprobe
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/dataprobe/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_BACKEND: &str = "anthropic";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OWNER: &str = "local";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AiSection {
    /// Backend: "anthropic" (default), "openai", "openrouter", "ollama"
    pub backend: Option<String>,

    /// Model override for the selected backend
    pub model: Option<String>,

    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,

    /// Ollama URL (default: http://localhost:11434)
    pub ollama_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct StorageSection {
    /// Root for saved uploads, reports and records
    pub data_dir: Option<PathBuf>,

    /// Owner recorded on saved profiles
    pub owner: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/dataprobe/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        let path = Self::user_config_path();
        Ok(Self::load_from(path.as_deref(), |key| {
            std::env::var(key).ok()
        }))
    }

    /// Load from an explicit file and environment lookup.
    ///
    /// An unreadable or invalid file is skipped with a warning.
    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = UserConfig::default();

        if let Some(path) = path.filter(|p| p.exists()) {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<UserConfig>(&content) {
                    Ok(file_config) => config.merge(file_config),
                    Err(e) => warn!("Ignoring invalid config {}: {}", path.display(), e),
                },
                Err(e) => warn!("Could not read config {}: {}", path.display(), e),
            }
        }

        // Environment variables override everything
        if let Some(key) = env("ANTHROPIC_API_KEY") {
            config.ai.anthropic_api_key = Some(key);
        }
        if let Some(key) = env("OPENAI_API_KEY") {
            config.ai.openai_api_key = Some(key);
        }
        if let Some(key) = env("OPENROUTER_API_KEY") {
            config.ai.openrouter_api_key = Some(key);
        }
        if let Some(owner) = env("DATAPROBE_OWNER") {
            config.storage.owner = Some(owner);
        }
        if let Some(dir) = env("DATAPROBE_DATA_DIR") {
            config.storage.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dataprobe").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        let UserConfig { ai, storage } = other;
        if ai.backend.is_some() {
            self.ai.backend = ai.backend;
        }
        if ai.model.is_some() {
            self.ai.model = ai.model;
        }
        if ai.anthropic_api_key.is_some() {
            self.ai.anthropic_api_key = ai.anthropic_api_key;
        }
        if ai.openai_api_key.is_some() {
            self.ai.openai_api_key = ai.openai_api_key;
        }
        if ai.openrouter_api_key.is_some() {
            self.ai.openrouter_api_key = ai.openrouter_api_key;
        }
        if ai.ollama_url.is_some() {
            self.ai.ollama_url = ai.ollama_url;
        }
        if storage.data_dir.is_some() {
            self.storage.data_dir = storage.data_dir;
        }
        if storage.owner.is_some() {
            self.storage.owner = storage.owner;
        }
    }

    pub fn ai_backend(&self) -> &str {
        self.ai.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    pub fn ai_model(&self) -> Option<&str> {
        self.ai.model.as_deref()
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.ai.anthropic_api_key.as_deref()
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.ai.openai_api_key.as_deref()
    }

    pub fn openrouter_api_key(&self) -> Option<&str> {
        self.ai.openrouter_api_key.as_deref()
    }

    pub fn ollama_url(&self) -> &str {
        self.ai.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    /// Root directory for saved data
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(crate::storage::default_data_dir)
    }

    pub fn owner(&self) -> &str {
        self.storage.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// Create the example user config if none exists.
    ///
    /// Returns the config path and whether a file was written.
    pub fn init_user_config() -> Result<(PathBuf, bool)> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        let created = Self::write_example(&config_path)?;
        Ok((config_path, created))
    }

    /// Write the example config to `path` unless a file is already there.
    ///
    /// Returns whether a file was written.
    pub fn write_example(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let example = r#"# Dataprobe User Configuration

[ai]
# Backend: "anthropic" (default), "openai", "openrouter" or "ollama" (free, local)
# backend = "anthropic"
# model = "claude-3-haiku-20240307"

# Keys can also come from ANTHROPIC_API_KEY / OPENAI_API_KEY / OPENROUTER_API_KEY
# anthropic_api_key = "sk-ant-..."
# openai_api_key = "sk-..."
# openrouter_api_key = "sk-or-..."

# ollama_url = "http://localhost:11434"

[storage]
# Where `profile --save` keeps uploads, reports and records
# (also DATAPROBE_DATA_DIR)
# data_dir = "/path/to/dataprobe-data"

# Owner recorded on saved profiles (also DATAPROBE_OWNER)
# owner = "local"
"#;
        std::fs::write(path, example)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert_eq!(config.ai_backend(), "anthropic");
        assert_eq!(config.ollama_url(), "http://localhost:11434");
        assert_eq!(config.owner(), "local");
        assert!(config.anthropic_api_key().is_none());
        assert!(config.ai_model().is_none());
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let config = UserConfig::load_from(None, no_env);
        assert_eq!(config.ai_backend(), "anthropic");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[ai]
backend = "ollama"
ollama_url = "http://gpu-box:11434"

[storage]
owner = "ml-team"
data_dir = "/srv/dataprobe"
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai_backend(), "ollama");
        assert_eq!(config.ollama_url(), "http://gpu-box:11434");
        assert_eq!(config.owner(), "ml-team");
        assert_eq!(config.data_dir(), PathBuf::from("/srv/dataprobe"));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[ai]\nanthropic_api_key = \"sk-file\"\n[storage]\nowner = \"file-owner\"\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("ANTHROPIC_API_KEY", "sk-env"),
            ("DATAPROBE_DATA_DIR", "/tmp/dp"),
        ]
        .into_iter()
        .collect();
        let config = UserConfig::load_from(Some(&path), |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.anthropic_api_key(), Some("sk-env"));
        assert_eq!(config.owner(), "file-owner");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/dp"));
    }

    #[test]
    fn test_invalid_toml_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [[ not valid toml {{{}}}").unwrap();

        let config = UserConfig::load_from(Some(&path), no_env);
        assert_eq!(config.ai_backend(), "anthropic");
    }

    #[test]
    fn test_merge_preserves_base_when_other_is_none() {
        let mut base = UserConfig::default();
        base.ai.openai_api_key = Some("sk-original".to_string());
        base.merge(UserConfig::default());
        assert_eq!(base.openai_api_key(), Some("sk-original"));
    }

    #[test]
    fn test_write_example_is_parseable_and_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(UserConfig::write_example(&path).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(toml::from_str::<UserConfig>(&content).is_ok());

        std::fs::write(&path, "# mine\n").unwrap();
        assert!(!UserConfig::write_example(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }

    #[test]
    fn test_user_config_path_returns_some() {
        if let Some(p) = UserConfig::user_config_path() {
            assert!(p.ends_with("dataprobe/config.toml"));
        }
    }
}
