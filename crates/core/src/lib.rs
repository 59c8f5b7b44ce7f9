//! Fraud radar domain model.
//!
//! Shared by every crate in the workspace. Holds the message shapes, the
//! fixed detection limits, [`CoreError`] and the capability traits the
//! detector is wired against. [`config`] has the environment lookups the
//! binaries read their settings through.

pub mod alert;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod fraud_event;
pub mod limits;
pub mod transaction;
pub mod types;
pub mod user;

pub use alert::{FraudAlert, RiskVerdict};
pub use error::CoreError;
pub use fraud_event::FraudEvent;
pub use transaction::Transaction;
pub use user::{UserProfile, UserStats};
