use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A backing store failed. The engine performs no retries; backoff and
    /// retry policy belong to the caller.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(#[from] StoreError),
}
