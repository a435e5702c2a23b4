/// Errors raised by the change journal.
///
/// The journal is purely in-memory; `InvalidSnapshot` is the only failure it
/// raises itself. `CallbackFailed` wraps whatever a caller-supplied
/// `on_revert`/`on_commit` callback raises — the journal never inspects that
/// error, it only propagates it.
#[derive(thiserror::Error, Debug)]
pub enum JournalError<E> {
    #[error("snapshot {0} is not a valid journal index")]
    InvalidSnapshot(i64),
    #[error("revert/commit callback failed: {0}")]
    CallbackFailed(E),
}

impl<E> JournalError<E> {
    pub fn is_invalid_snapshot(&self) -> bool {
        matches!(self, JournalError::InvalidSnapshot(_))
    }
}
