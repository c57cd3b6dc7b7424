use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },

    #[error("invalid embedding dimension: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("minimum result count cannot be zero")]
    ZeroMinResults,
}
