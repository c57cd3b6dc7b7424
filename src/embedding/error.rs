use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid provider response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension invalid: {0}")]
    Dimension(#[from] DimValidationError),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
