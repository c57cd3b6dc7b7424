use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding dimension mismatch: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("candidate {candidate_id} has no usable embedding vector")]
    MissingVector { candidate_id: uuid::Uuid },
}

pub type ScoringResult<T> = Result<T, ScoringError>;
