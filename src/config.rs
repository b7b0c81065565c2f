use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::loader::SwapRule;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub data: DataConfig,
}

/// Language-model settings for the chat filter.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Without a key the chat answers that the assistant is unavailable.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    pub swap_rule: SwapRule,
    /// CSV opened at startup instead of the built-in sample.
    pub startup_csv: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let swap_rule = match non_empty("CENTROS_SWAP_RULE") {
            Some(raw) => raw.parse::<SwapRule>().map_err(|reason| ConfigError::Invalid {
                key: "CENTROS_SWAP_RULE",
                reason,
            })?,
            None => SwapRule::default(),
        };

        Ok(Config {
            assistant: AssistantConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            data: DataConfig {
                swap_rule,
                startup_csv: non_empty("CENTROS_CSV").map(PathBuf::from),
            },
        })
    }
}
