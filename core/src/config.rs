//! Client configuration sourced from the environment.

use std::time::Duration;

use thiserror::Error;

pub const BASE_URL_VAR: &str = "WATERLOG_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "WATERLOG_TIMEOUT_MS";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WATERLOG_TIMEOUT_MS must be a whole number of milliseconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to every call made through `WaterlogApi`. `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            None => None,
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
        };

        Ok(Self { base_url, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_local_default() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000/api/v1");
    }

    #[test]
    fn reads_base_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://api.example.com/api/v1"),
            (TIMEOUT_VAR, "1500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/api/v1");
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_or_blank_timeout_disables_it() {
        let zero = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).unwrap();
        assert!(zero.timeout.is_none());
        let blank = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, " ")])).unwrap();
        assert!(blank.timeout.is_none());
    }

    #[test]
    fn rejects_garbage_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }
}
