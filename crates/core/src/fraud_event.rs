//! Audit record of one evaluated transaction.

use serde::Serialize;

use crate::alert::FraudAlert;
use crate::transaction::Transaction;

/// Written once per evaluated transaction with the final decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudEvent {
    pub transaction_id: String,
    pub user_id: String,
    pub merchant: String,
    pub amount: f64,
    pub location: String,
    pub is_blocked: bool,
    pub ai_reason: String,
    pub ai_push_msg: String,
}

impl FraudEvent {
    /// Build the audit record for `tx` from its final verdict.
    pub fn from_verdict(tx: &Transaction, alert: &FraudAlert) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            user_id: tx.user_id.clone(),
            merchant: tx.merchant.clone(),
            amount: tx.amount,
            location: tx.location.clone(),
            is_blocked: alert.is_blocked,
            ai_reason: alert.reason.clone(),
            ai_push_msg: alert.ai_push_msg.clone(),
        }
    }
}
