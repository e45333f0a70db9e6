use std::env;

use thiserror::Error;

use crate::{contract::ContractMode, services::stripe::provider::DEFAULT_API_BASE};

pub const HOST: &str = "0.0.0.0";
pub const PORT: u16 = 12111;
pub const DEFAULT_SECRET_KEY: &str = "sk_test_mock";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Loads `.env` in debug builds only.
pub fn load_dotenv() {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
}

fn from_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When set, the only key the mock server accepts.
    pub api_key: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(from_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| HOST.to_string());
        let port = lookup("PORT")
            .and_then(|port| port.parse().ok())
            .unwrap_or(PORT);

        Self {
            host,
            port,
            api_key: lookup("MOCK_API_KEY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub secret_key: String,
    pub mode: ContractMode,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(from_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if url::Url::parse(&api_base).is_err() {
            return Err(ConfigError::InvalidUrl {
                var: "STRIPE_API_BASE",
                value: api_base,
            });
        }

        let live = lookup("CONTRACT_LIVE")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(Self {
            api_base,
            secret_key: lookup("STRIPE_SECRET_KEY")
                .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            mode: if live {
                ContractMode::Live
            } else {
                ContractMode::Mock
            },
        })
    }
}
