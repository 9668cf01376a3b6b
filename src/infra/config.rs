// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub chain: ChainConfig,
}

/// Settings for the remote image edit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub quality: String,
    pub size: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "gpt-image-1".into(),
            quality: "high".into(),
            size: "1024x1024".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Directory under which run workspaces are created.
    pub output_root: PathBuf,
    /// Largest iteration count the CLI accepts.
    pub max_iterations: usize,
    /// Default retry budget. Absent means prompt on every failure.
    pub retries: Option<u32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            max_iterations: 999,
            retries: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
