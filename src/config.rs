use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::kernel::reactor::ReactorConfig;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";
const DEFAULT_NOTIFY_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT_MS: u64 = 8_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub analysis_model: String,
    pub notification_model: String,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            notification_model: DEFAULT_NOTIFY_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub reactor: ReactorConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = ServiceConfig::default();

        let service = ServiceConfig {
            api_key: get("GEMINI_API_KEY"),
            base_url: get("NEURALATOR_API_BASE").unwrap_or(defaults.base_url),
            analysis_model: get("NEURALATOR_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            notification_model: get("NEURALATOR_NOTIFY_MODEL").unwrap_or(defaults.notification_model),
            timeout_ms: parse_number("NEURALATOR_TIMEOUT_MS", get("NEURALATOR_TIMEOUT_MS"))?
                .unwrap_or(defaults.timeout_ms),
        };

        let reactor = ReactorConfig {
            rng_seed: parse_number("NEURALATOR_SEED", get("NEURALATOR_SEED"))?,
        };

        Ok(Self { reactor, service })
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}
