//! Inbound transaction event.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A single payment attempt as published on the inbound topic.
///
/// Produced upstream and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub merchant: String,
    pub location: String,
    /// Originating address of the payment request.
    pub ip: String,
    pub timestamp: Timestamp,
}
