use super::error::ClientError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "JSONAPI_BASE_URL";
pub const TIMEOUT_ENV: &str = "JSONAPI_TIMEOUT_SECS";

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for [`HttpJsonClient`](super::HttpJsonClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Request URLs are resolved against this.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Reads `JSONAPI_BASE_URL` (required) and `JSONAPI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let base_url = lookup(BASE_URL_ENV).ok_or(ClientError::MissingEnv(BASE_URL_ENV))?;
        let mut config = Self::new(base_url);
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|_| ClientError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"base_url":"http://localhost:3000"}"#).unwrap();
        assert_eq!(config, TransportConfig::new("http://localhost:3000"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_environment_lookup() {
        let config = TransportConfig::from_lookup(|name| match name {
            BASE_URL_ENV => Some("https://api.example.com/".to_owned()),
            TIMEOUT_ENV => Some("5".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/");
        assert_eq!(config.timeout_secs, 5);

        let missing = TransportConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(missing, ClientError::MissingEnv(BASE_URL_ENV)));

        let invalid = TransportConfig::from_lookup(|name| match name {
            BASE_URL_ENV => Some("http://x".to_owned()),
            _ => Some("soon".to_owned()),
        })
        .unwrap_err();
        assert!(matches!(invalid, ClientError::InvalidEnv { name: TIMEOUT_ENV, .. }));
    }
}
