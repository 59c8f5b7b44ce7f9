//! Query functions grouped per table.

mod fraud_event_repo;
mod user_repo;

pub use fraud_event_repo::FraudEventRepo;
pub use user_repo::UserRepo;
