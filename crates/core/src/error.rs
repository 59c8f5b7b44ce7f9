/// Boxed driver error carried by the infrastructure variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[source] BoxError),

    #[error("Cache error: {0}")]
    Cache(#[source] BoxError),

    #[error("Risk service unavailable: {0}")]
    RiskService(#[source] BoxError),

    #[error("Publish error: {0}")]
    Publish(#[source] BoxError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl CoreError {
    pub fn store(err: impl Into<BoxError>) -> Self {
        Self::Store(err.into())
    }

    pub fn cache(err: impl Into<BoxError>) -> Self {
        Self::Cache(err.into())
    }

    pub fn risk_service(err: impl Into<BoxError>) -> Self {
        Self::RiskService(err.into())
    }

    pub fn publish(err: impl Into<BoxError>) -> Self {
        Self::Publish(err.into())
    }
}
