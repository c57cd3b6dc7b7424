use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {reason}")]
    Backend { reason: String },
}

impl StoreError {
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
