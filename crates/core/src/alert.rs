//! Risk engine verdicts and the published fraud alert.

use serde::{Deserialize, Serialize};

use crate::limits::FAIL_SAFE_REASON;
use crate::transaction::Transaction;

/// Decision returned by the remote risk engine (or its cached copy).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub reason: String,
    /// User-facing notification text suggested by the engine.
    #[serde(default)]
    pub ai_push_msg: String,
    pub is_blocked: bool,
}

impl RiskVerdict {
    /// Verdict substituted when the risk engine is unavailable.
    ///
    /// Never blocks: an outage of the engine must not halt payments.
    pub fn fail_safe() -> Self {
        Self {
            reason: FAIL_SAFE_REASON.to_string(),
            ai_push_msg: String::new(),
            is_blocked: false,
        }
    }
}

/// Final verdict for one transaction, published on the alerts topic and
/// relayed to dashboard viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAlert {
    pub transaction_id: String,
    pub reason: String,
    #[serde(default)]
    pub ai_push_msg: String,
    pub is_blocked: bool,
    pub amount: f64,
    pub location: String,
    pub merchant: String,
}

impl FraudAlert {
    pub fn for_transaction(
        tx: &Transaction,
        is_blocked: bool,
        reason: String,
        ai_push_msg: String,
    ) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            reason,
            ai_push_msg,
            is_blocked,
            amount: tx.amount,
            location: tx.location.clone(),
            merchant: tx.merchant.clone(),
        }
    }
}
