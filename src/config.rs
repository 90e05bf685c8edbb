use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::GEMINI_MODEL_NAME;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    /// Gemini API key. When absent, `load` falls back to the GEMINI_API_KEY
    /// environment variable. A still-missing key is reported at analysis
    /// time as a configuration error, not here.
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    GEMINI_MODEL_NAME.to_string()
}

impl Config {
    /// Load `config.yml` from the working directory. The file is optional;
    /// defaults are used when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml_ng::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty());
        }

        Ok(config)
    }
}
