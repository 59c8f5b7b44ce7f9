//! HTTP client for the remote risk engine.
//!
//! [`RiskClient`] posts one JSON request per transaction. Failed attempts
//! are retried with a fixed delay; the whole exchange is bounded by a single
//! timeout and aborted early when the shutdown token fires.

use std::time::Duration;

use async_trait::async_trait;
use radar_core::capabilities::RiskAnalyzer;
use radar_core::{CoreError, RiskVerdict, Transaction, UserProfile};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Path of the analysis endpoint relative to the engine's base URL.
const ANALYZE_PATH: &str = "/v1/analyze";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body sent to the risk engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: f64,
    pub merchant: String,
    pub location: String,
    /// Feature summary of the user, see [`UserProfile::context_summary`].
    pub user_profile_context: String,
}

impl AnalyzeRequest {
    pub fn new(tx: &Transaction, profile: &UserProfile) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            user_id: tx.user_id.clone(),
            amount: tx.amount,
            merchant: tx.merchant.clone(),
            location: tx.location.clone(),
            user_profile_context: profile.context_summary(),
        }
    }
}

/// Response body returned by the risk engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub reason: String,
    #[serde(default)]
    pub ai_push_msg: String,
    pub is_blocked: bool,
}

impl From<AnalyzeResponse> for RiskVerdict {
    fn from(resp: AnalyzeResponse) -> Self {
        Self {
            reason: resp.reason,
            ai_push_msg: resp.ai_push_msg,
            is_blocked: resp.is_blocked,
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RiskClientError {
    /// The underlying HTTP request failed (network, DNS, decode, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("Risk engine returned HTTP {0}")]
    HttpStatus(u16),

    /// Every attempt failed; carries the last failure.
    #[error("Risk engine failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<RiskClientError>,
    },

    /// The overall deadline elapsed before any attempt succeeded.
    #[error("Risk engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Risk engine call cancelled")]
    Cancelled,
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Attempts, pause between attempts and overall deadline of one analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(200),
            timeout: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// RiskClient
// ---------------------------------------------------------------------------

pub struct RiskClient {
    http: reqwest::Client,
    endpoint: String,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl RiskClient {
    /// Create a client for the engine at `base_url` (e.g.
    /// `http://ai-risk-engine:50051`).
    ///
    /// In-flight calls return [`RiskClientError::Cancelled`] once `cancel`
    /// fires.
    pub fn new(base_url: &str, cancel: CancellationToken) -> Result<Self, RiskClientError> {
        Self::with_policy(base_url, RetryPolicy::default(), cancel)
    }

    pub fn with_policy(
        base_url: &str,
        policy: RetryPolicy,
        cancel: CancellationToken,
    ) -> Result<Self, RiskClientError> {
        let http = reqwest::Client::builder().timeout(policy.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{ANALYZE_PATH}", base_url.trim_end_matches('/')),
            policy,
            cancel,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a verdict, retrying per the policy.
    pub async fn request_verdict(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<RiskVerdict, RiskClientError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RiskClientError::Cancelled),
            result = tokio::time::timeout(self.policy.timeout, self.call_with_retry(request)) => {
                result.unwrap_or(Err(RiskClientError::Timeout(self.policy.timeout)))
            }
        }
    }

    async fn call_with_retry(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<RiskVerdict, RiskClientError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_call(request).await {
                Ok(verdict) => return Ok(verdict),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        tx_id = %request.transaction_id,
                        error = %e,
                        "Risk engine call failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(e) => {
                    return Err(RiskClientError::Exhausted {
                        attempts,
                        last: Box::new(e),
                    });
                }
            }
        }
    }

    /// Execute a single POST and decode the verdict.
    async fn try_call(&self, request: &AnalyzeRequest) -> Result<RiskVerdict, RiskClientError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        if !response.status().is_success() {
            return Err(RiskClientError::HttpStatus(response.status().as_u16()));
        }
        let body: AnalyzeResponse = response.json().await?;
        Ok(body.into())
    }
}

#[async_trait]
impl RiskAnalyzer for RiskClient {
    async fn analyze(
        &self,
        tx: &Transaction,
        profile: &UserProfile,
    ) -> Result<RiskVerdict, CoreError> {
        match self.request_verdict(&AnalyzeRequest::new(tx, profile)).await {
            Ok(verdict) => Ok(verdict),
            Err(RiskClientError::Cancelled) => Err(CoreError::Cancelled),
            Err(e) => Err(CoreError::risk_service(e)),
        }
    }
}
