//! Per-transaction fraud decision path.
//!
//! - [`FraudDetector`]: combines profile, stats, velocity and the risk
//!   engine verdict into one published [`FraudAlert`](radar_core::FraudAlert).
//! - [`RiskClient`]: HTTP client for the remote risk engine with bounded
//!   retry, overall timeout and cancellation.

pub mod detector;
pub mod risk_client;

pub use detector::{compose_decision, Decision, FraudDetector};
pub use risk_client::{RetryPolicy, RiskClient, RiskClientError};
