//! Configuration management

use crate::error::{LecternError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for the generation service
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model name for generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation service
    #[serde(default = "default_llm_url")]
    pub llm_url: String,

    /// Maximum chunks the store returns per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Conversation exchanges kept when rendering session history
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Tool dispatches allowed per query before forcing a text answer
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_model(),
            llm_url: default_llm_url(),
            max_results: default_max_results(),
            max_history: default_max_history(),
            timeout_secs: default_timeout(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

fn default_api_key() -> String {
    std::env::var("LECTERN_API_KEY")
        .or_else(|_| std::env::var("GEMINI_API_KEY"))
        .unwrap_or_default()
}

fn default_model() -> String {
    std::env::var("LECTERN_MODEL")
        .or_else(|_| std::env::var("GEMINI_MODEL"))
        .unwrap_or_else(|_| "gemini-2.5-flash".to_string())
}

fn default_llm_url() -> String {
    std::env::var("LECTERN_LLM_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

fn default_max_results() -> usize {
    5
}

fn default_max_history() -> usize {
    2
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tool_rounds() -> usize {
    1
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path, falling back to defaults when
    /// the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save config to a specific path, creating parent directories as
    /// needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Check that the configuration is usable, collecting every problem
    /// into a single error
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.api_key.trim().is_empty() {
            errors.push("api_key is required (set LECTERN_API_KEY or GEMINI_API_KEY)");
        }
        if self.model.trim().is_empty() {
            errors.push("model must not be empty (set LECTERN_MODEL)");
        }
        if self.llm_url.trim().is_empty() {
            errors.push("llm_url must not be empty (set LECTERN_LLM_URL)");
        }
        if self.max_results == 0 {
            errors.push("max_results must be at least 1");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LecternError::Config(errors.join("; ")))
        }
    }

    /// One-line settings summary with the API key redacted
    pub fn debug_summary(&self) -> String {
        let key_display = if self.api_key.is_empty() {
            "unset".to_string()
        } else if self.api_key.chars().count() > 8 {
            let prefix: String = self.api_key.chars().take(8).collect();
            format!("{}...", prefix)
        } else {
            "****".to_string()
        };

        format!(
            "model={} url={} api_key={} max_results={} max_history={} timeout={}s tool_rounds={}",
            self.model,
            self.llm_url,
            key_display,
            self.max_results,
            self.max_history,
            self.timeout_secs,
            self.max_tool_rounds,
        )
    }
}
