use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{redirect, Client, Response, StatusCode};
use uuid::Uuid;

use crate::errors::ProbeError;

use super::{domain::ProbeTarget, models::HealthReport};

const USER_AGENT: &str = concat!("status-probe/", env!("CARGO_PKG_VERSION"));

/// Largest status body read for diagnostics; larger bodies are dropped unread.
pub const MAX_REPORT_BYTES: usize = 4 * 1024;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Probe {
    /// Sends exactly one request to `target` and checks the status it answers with.
    async fn check(&self, target: &ProbeTarget) -> Result<(), ProbeError>;
}

/// Single-shot HTTP GET health check.
///
/// Redirects are not followed and nothing is retried, so every call to
/// [`Probe::check`] issues one request and yields one outcome.
#[derive(Debug)]
pub struct HealthProbe {
    client: Client,
    expected: StatusCode,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(expected_status: u16, timeout: Duration) -> Result<Self, ProbeError> {
        let expected = StatusCode::from_u16(expected_status)
            .map_err(|_| ProbeError::InvalidStatus(expected_status))?;

        if timeout.is_zero() {
            return Err(ProbeError::InvalidTimeout);
        }

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProbeError::ClientError)?;

        Ok(Self {
            client,
            expected,
            timeout,
        })
    }

    pub fn expected_status(&self) -> StatusCode {
        self.expected
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Probe for HealthProbe {
    #[tracing::instrument(
        name = "Probing service health",
        skip(self, target),
        fields(
            probe_id = %Uuid::new_v4(),
            url = %target
        )
    )]
    async fn check(&self, target: &ProbeTarget) -> Result<(), ProbeError> {
        let res = self
            .client
            .get(target.url().clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                let e = ProbeError::connection(target.as_str(), e);
                tracing::warn!(error = ?e, "Health probe could not reach the service.");
                e
            })?;

        let actual = res.status();

        if actual == self.expected {
            tracing::info!(status = actual.as_u16(), "Service is healthy.");
            return Ok(());
        }

        // the body shares the request's timeout
        let details = read_details(res).await;

        tracing::warn!(
            status = actual.as_u16(),
            expected = self.expected.as_u16(),
            details = details.as_deref().unwrap_or_default(),
            "Service answered with an unexpected status."
        );

        Err(ProbeError::UnexpectedStatus {
            actual,
            expected: self.expected,
            details,
        })
    }
}

async fn read_details(mut res: Response) -> Option<String> {
    if res.content_length().is_some_and(|len| len > MAX_REPORT_BYTES as u64) {
        return None;
    }

    let mut body = Vec::new();
    while let Some(chunk) = res.chunk().await.ok()? {
        if body.len() + chunk.len() > MAX_REPORT_BYTES {
            return None;
        }
        body.extend_from_slice(&chunk);
    }

    serde_json::from_slice::<HealthReport>(&body).ok()?.details
}

/// Probes `target` once, expecting `expected_status` within `timeout`.
pub async fn check(
    target: &ProbeTarget,
    expected_status: u16,
    timeout: Duration,
) -> Result<(), ProbeError> {
    HealthProbe::new(expected_status, timeout)?.check(target).await
}
