use thiserror::Error;
use uuid::Uuid;

use crate::ledger::LedgerError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown user: {0}")]
    UnknownUser(Uuid),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
