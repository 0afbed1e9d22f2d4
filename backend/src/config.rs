use std::env;
use std::time::Duration;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Process-wide configuration, built once at startup and passed explicitly
/// into each component's constructor. Read-only after initialization.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub classifier_url: Url,
    pub classifier_timeout: Duration,
    pub cohere_api_url: Url,
    pub cohere_api_key: String,
    pub cohere_model: String,
    pub synthesis_timeout: Duration,
    pub port: u16,
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
    })
}

fn secs_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
            }),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let classifier_url = env::var("CLASSIFIER_URL")
            .unwrap_or_else(|_| "http://localhost:8000/predict".to_string());
        let cohere_api_url = env::var("COHERE_API_URL")
            .unwrap_or_else(|_| "https://api.cohere.com/v1/chat".to_string());
        let cohere_api_key =
            env::var("COHERE_API_KEY").map_err(|_| ConfigError::MissingVar("COHERE_API_KEY"))?;
        let cohere_model =
            env::var("COHERE_MODEL").unwrap_or_else(|_| "command-r-plus".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 5000,
        };

        Ok(Self {
            classifier_url: parse_url("CLASSIFIER_URL", &classifier_url)?,
            classifier_timeout: secs_var("CLASSIFIER_TIMEOUT_SECS", 20)?,
            cohere_api_url: parse_url("COHERE_API_URL", &cohere_api_url)?,
            cohere_api_key,
            cohere_model,
            synthesis_timeout: secs_var("SYNTHESIS_TIMEOUT_SECS", 30)?,
            port,
        })
    }
}
