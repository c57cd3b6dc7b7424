use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl LedgerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
