use evmstate_common::Address;
use evmstate_journal::JournalError;
use std::convert::Infallible;

/// Errors raised by the world state (§4.B).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldStateError {
    #[error("no account at {0:?} to write storage on")]
    MissingAccount(Address),
    #[error("snapshot {0} is not a valid journal index")]
    InvalidSnapshot(i64),
    #[error("snapshot id {0} is not on the world-state snapshot stack")]
    UnknownSnapshot(u64),
}

impl WorldStateError {
    pub(crate) fn from_journal_error(err: JournalError<Infallible>) -> Self {
        match err {
            JournalError::InvalidSnapshot(idx) => WorldStateError::InvalidSnapshot(idx),
            JournalError::CallbackFailed(never) => match never {},
        }
    }
}

/// Errors raised by the transient-storage store (§4.C). Writes never fail;
/// only snapshot hygiene can.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientStorageError {
    #[error("snapshot id {0} is not on the transient-storage snapshot stack")]
    UnknownTransientSnapshot(u64),
}

/// Errors raised by the transaction boundary (§4.D). The boundary does not
/// attempt compensating action when one store errors after the other
/// succeeded — the error surfaces and the caller's next action is expected
/// to be `clear`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("no active transaction to commit or roll back")]
    NoActiveTransaction,
    #[error("world state error: {0}")]
    WorldState(#[from] WorldStateError),
    #[error("transient storage error: {0}")]
    TransientStorage(#[from] TransientStorageError),
}
