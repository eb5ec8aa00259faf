use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend origin used when [`BASE_URL_VAR`] is unset or empty.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const BASE_URL_VAR: &str = "ANALYSIS_API_URL";
const POLL_INTERVAL_VAR: &str = "ANALYSIS_POLL_INTERVAL_SECS";
const SUBMIT_TIMEOUT_VAR: &str = "ANALYSIS_SUBMIT_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base url {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("{key} must be a positive whole number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
}

/// Engine settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub base_url: Url,
    /// Hard bound on a single health probe.
    pub probe_timeout: Duration,
    pub poll_interval: Duration,
    /// Hard bound on an upload, including remote processing.
    pub submit_timeout: Duration,
    pub connect_timeout: Duration,
    pub upload_path: String,
    /// Multipart field name carrying each file.
    pub upload_field: String,
    pub upload_chunk_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            probe_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(30),
            submit_timeout: Duration::from_secs(180),
            connect_timeout: Duration::from_secs(10),
            upload_path: "/upload".to_string(),
            upload_field: "videos".to_string(),
            upload_chunk_bytes: 64 * 1024,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = match lookup(BASE_URL_VAR) {
            Some(raw) => Self::with_base_url(&raw)?,
            None => Self::default(),
        };
        if let Some(raw) = lookup(POLL_INTERVAL_VAR) {
            config.poll_interval = parse_seconds(POLL_INTERVAL_VAR, &raw)?;
        }
        if let Some(raw) = lookup(SUBMIT_TIMEOUT_VAR) {
            config.submit_timeout = parse_seconds(SUBMIT_TIMEOUT_VAR, &raw)?;
        }
        Ok(config)
    }

    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(raw)?,
            ..Self::default()
        })
    }

    pub fn health_url(&self) -> Url {
        self.endpoint("health")
    }

    pub fn upload_url(&self) -> Url {
        self.endpoint(&self.upload_path)
    }

    /// Appends `path` to the base url, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other}"))),
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be a base".to_string()));
    }
    Ok(url)
}

fn parse_seconds(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_to_local_origin() {
        let config = EngineConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.health_url().as_str(), "http://localhost:5000/health");
        assert_eq!(config.upload_url().as_str(), "http://localhost:5000/upload");
    }

    #[test]
    fn empty_base_url_counts_as_unset() {
        let config = EngineConfig::from_lookup(env(&[(BASE_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let config =
            EngineConfig::from_lookup(env(&[(BASE_URL_VAR, "https://api.example.com/v1/")]))
                .unwrap();
        assert_eq!(
            config.health_url().as_str(),
            "https://api.example.com/v1/health"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = EngineConfig::from_lookup(env(&[(BASE_URL_VAR, "ftp://example.com")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn overrides_poll_interval_and_rejects_zero() {
        let config =
            EngineConfig::from_lookup(env(&[("ANALYSIS_POLL_INTERVAL_SECS", "10")])).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(10));

        let err = EngineConfig::from_lookup(env(&[("ANALYSIS_SUBMIT_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSeconds {
                key: "ANALYSIS_SUBMIT_TIMEOUT_SECS",
                value: "0".to_string(),
            }
        );
    }
}
