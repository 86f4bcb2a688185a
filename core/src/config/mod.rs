//! Agent and reasoning-engine configuration

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Env var holding the OpenRouter API key
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Env var holding the Wolfram Alpha app id
pub const WOLFRAM_APP_ID_ENV: &str = "WOLFRAM_APP_ID";

/// Reasoning engine connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (resolved from file or env; never logged)
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; benchmark runs want determinism
    #[serde(default)]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "anthropic/claude-3.7-sonnet".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
        }
    }
}

/// Control loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard bound on reasoning steps per question
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Bound on consecutive corrective retries for unparseable engine
    /// output or format violations
    #[serde(default = "default_max_correction_retries")]
    pub max_correction_retries: usize,

    /// App id for the Wolfram Alpha adapter
    #[serde(default)]
    pub wolfram_app_id: String,
}

fn default_max_steps() -> usize {
    15
}

fn default_max_correction_retries() -> usize {
    3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_correction_retries: default_max_correction_retries(),
            wolfram_app_id: String::new(),
        }
    }
}

/// Combined settings, loadable from a JSON file overlaid with env vars
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Settings {
    /// Default config location: `<config dir>/gaia/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gaia").join("config.json"))
    }

    /// Load settings.
    ///
    /// Resolution order: explicit file (error if missing) or the default
    /// location (skipped if absent), then env var overrides for secrets.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    })?;
                Self::parse(&content)?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "loading config file");
                    let content = std::fs::read_to_string(&path)?;
                    Self::parse(&content)?
                }
                None => Self::default(),
            },
        };

        if let Ok(key) = std::env::var(OPENROUTER_API_KEY_ENV) {
            settings.llm.api_key = key;
        }
        if let Ok(app_id) = std::env::var(WOLFRAM_APP_ID_ENV) {
            settings.agent.wolfram_app_id = app_id;
        }

        Ok(settings)
    }

    fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            ConfigError::InvalidFormat {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Fail early if the reasoning engine cannot be reached
    pub fn require_api_key(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey {
                env_var: OPENROUTER_API_KEY_ENV.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.agent.max_steps, 15);
        assert_eq!(settings.agent.max_correction_retries, 3);
        assert!(settings.llm.base_url.contains("openrouter.ai"));
        assert_eq!(settings.llm.temperature, 0.0);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings = Settings::parse(r#"{"agent": {"max_steps": 5}}"#).unwrap();
        assert_eq!(settings.agent.max_steps, 5);
        assert_eq!(settings.agent.max_correction_retries, 3);
        assert_eq!(settings.llm.model, "anthropic/claude-3.7-sonnet");
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(Settings::parse("{not json").is_err());
    }

    #[test]
    fn missing_api_key_is_reported() {
        let settings = Settings::default();
        assert!(settings.require_api_key().is_err());
    }
}
