//! Append-only change journal with snapshot/restore/commit and a
//! `just_cache` entry class (§4.A of the state-layer design).
//!
//! This crate has no notion of accounts, storage, or transactions — it is a
//! generic tagged log keyed by [`JournalKey`]. The world-state and
//! transient-storage layers build their semantics on top of it.

mod entry;
mod error;
mod journal;

pub use entry::{JournalEntry, JournalKey, JournalValue, Tag};
pub use error::JournalError;
pub use journal::{ChangeJournal, Snapshot, EMPTY_SNAPSHOT};
