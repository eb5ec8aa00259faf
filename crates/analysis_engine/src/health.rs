use std::time::Duration;

use engine_logging::engine_debug;
use url::Url;

use crate::types::map_reqwest_kind;
use crate::{EngineConfig, FailureKind, HealthReport, ProbeError};

#[async_trait::async_trait]
pub trait HealthProber: Send + Sync {
    /// Runs one liveness check. Never takes longer than the configured timeout.
    async fn probe(&self) -> Result<HealthReport, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHealthProber {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl ReqwestHealthProber {
    pub fn new(config: &EngineConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout.min(config.probe_timeout))
            .timeout(config.probe_timeout)
            .build()
            .map_err(|err| ProbeError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            url: config.health_url(),
            timeout: config.probe_timeout,
        })
    }

    async fn fetch_report(&self) -> Result<HealthReport, ProbeError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice::<HealthReport>(&body)
            .map_err(|err| ProbeError::new(FailureKind::Malformed, err.to_string()))
    }
}

#[async_trait::async_trait]
impl HealthProber for ReqwestHealthProber {
    async fn probe(&self) -> Result<HealthReport, ProbeError> {
        // The outer bound also covers a body that trickles in after the headers.
        let report = match tokio::time::timeout(self.timeout, self.fetch_report()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProbeError::new(
                    FailureKind::Timeout,
                    format!("no response within {:?}", self.timeout),
                ))
            }
        };
        engine_debug!(
            "Health probe status={} components={}",
            report.status,
            report.components.len()
        );
        Ok(report)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProbeError {
    ProbeError::new(map_reqwest_kind(&err), err.to_string())
}
