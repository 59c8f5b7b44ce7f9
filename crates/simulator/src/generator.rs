//! Persona-based synthetic transactions.

use std::ops::Range;

use rand::Rng;
use radar_core::Transaction;

/// A demo customer with a characteristic spending pattern.
#[derive(Debug, Clone)]
pub struct Persona {
    pub user_id: &'static str,
    pub merchant: &'static str,
    pub location: &'static str,
    /// Whole-dollar amounts drawn from this range.
    pub amounts: Range<u32>,
}

pub const PERSONAS: [Persona; 3] = [
    Persona {
        user_id: "user-1",
        merchant: "Premium Apple Reseller",
        location: "Kyiv, Ukraine",
        amounts: 5_000..40_000,
    },
    Persona {
        user_id: "user-2",
        merchant: "Binance P2P Exchange",
        location: "Singapore",
        amounts: 100..3_100,
    },
    Persona {
        user_id: "user-3",
        merchant: "Local Supermarket",
        location: "Lviv, Ukraine",
        amounts: 20..820,
    },
];

/// Share of transactions replaced by the anomalous spike.
pub const ANOMALY_PROBABILITY: f64 = 0.05;
pub const ANOMALY_AMOUNT: f64 = 99_999.0;
pub const ANOMALY_MERCHANT: &str = "Unknown Global Store";
pub const ANOMALY_LOCATION: &str = "Lagos, Nigeria";

/// Draw one transaction for a random persona.
pub fn generate<R: Rng>(rng: &mut R) -> Transaction {
    let persona = &PERSONAS[rng.random_range(0..PERSONAS.len())];
    let anomalous = rng.random_bool(ANOMALY_PROBABILITY);
    build(persona, anomalous, rng)
}

/// Build a transaction for `persona`, optionally as the anomalous spike.
pub fn build<R: Rng>(persona: &Persona, anomalous: bool, rng: &mut R) -> Transaction {
    let now = chrono::Utc::now();
    let (amount, merchant, location) = if anomalous {
        (ANOMALY_AMOUNT, ANOMALY_MERCHANT, ANOMALY_LOCATION)
    } else {
        (
            f64::from(rng.random_range(persona.amounts.clone())),
            persona.merchant,
            persona.location,
        )
    };

    Transaction {
        id: format!("tx-{}", now.timestamp_nanos_opt().unwrap_or_default()),
        user_id: persona.user_id.to_string(),
        amount,
        currency: "USD".into(),
        merchant: merchant.to_string(),
        location: location.to_string(),
        ip: format!("192.168.1.{}", rng.random_range(1..=254)),
        timestamp: now,
    }
}
