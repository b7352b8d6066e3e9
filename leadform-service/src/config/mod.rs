use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default temperature for conversational turns.
const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;

/// Default output cap for a single chat turn.
const DEFAULT_CHAT_MAX_TOKENS: i32 = 200;

/// Default temperature for lead analysis (lower for determinism).
const DEFAULT_ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Default output cap for lead analysis (structured, longer than a turn).
const DEFAULT_ANALYSIS_MAX_TOKENS: i32 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct LeadformConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub openai: OpenAiConfig,
    pub tuning: TuningConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Chat model used for both conversation and analysis (e.g., gpt-4)
    pub model: String,
}

/// Generation tuning, fixed per-deployment (not user-configurable per request).
#[derive(Debug, Clone, Deserialize)]
pub struct TuningConfig {
    pub chat_temperature: f32,
    pub chat_max_tokens: i32,
    pub analysis_temperature: f32,
    pub analysis_max_tokens: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub local_path: String,
}

impl LeadformConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(LeadformConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("leadform_db"), is_prod)?,
            },
            openai: OpenAiConfig {
                api_key: get_env("OPENAI_API_KEY", None, is_prod)?,
                model: get_env("OPENAI_CHAT_MODEL", Some("gpt-4"), is_prod)?,
            },
            tuning: TuningConfig {
                chat_temperature: parse_env(
                    "LEADFORM_CHAT_TEMPERATURE",
                    DEFAULT_CHAT_TEMPERATURE,
                    is_prod,
                )?,
                chat_max_tokens: parse_env(
                    "LEADFORM_CHAT_MAX_TOKENS",
                    DEFAULT_CHAT_MAX_TOKENS,
                    is_prod,
                )?,
                analysis_temperature: parse_env(
                    "LEADFORM_ANALYSIS_TEMPERATURE",
                    DEFAULT_ANALYSIS_TEMPERATURE,
                    is_prod,
                )?,
                analysis_max_tokens: parse_env(
                    "LEADFORM_ANALYSIS_MAX_TOKENS",
                    DEFAULT_ANALYSIS_MAX_TOKENS,
                    is_prod,
                )?,
            },
            storage: StorageConfig {
                local_path: get_env("LEADFORM_STORAGE_PATH", Some("./uploads"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
{
    let raw = get_env(key, Some(&default.to_string()), is_prod)?;
    raw.parse().map_err(|_| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, raw))
    })
}
