use rustc_hash::FxHashSet;
use tracing::debug;

use crate::entry::{JournalEntry, JournalKey, Tag};
use crate::error::JournalError;

/// An index into the journal tail, or the sentinel `-1` meaning "empty".
pub type Snapshot = i64;

/// Sentinel snapshot denoting an empty journal.
pub const EMPTY_SNAPSHOT: Snapshot = -1;

/// Append-only log of tagged change entries with index-based snapshots and
/// selective revert/commit (§4.A).
#[derive(Debug, Default, Clone)]
pub struct ChangeJournal {
    entries: Vec<JournalEntry>,
}

/// Resolves a snapshot id to the length the log must be truncated to.
/// Returns `None` for a malformed or out-of-range snapshot.
fn target_length(snapshot: Snapshot, current_len: usize) -> Option<usize> {
    if snapshot < EMPTY_SNAPSHOT {
        return None;
    }
    let target = if snapshot == EMPTY_SNAPSHOT {
        0
    } else {
        usize::try_from(snapshot).ok()?.checked_add(1)?
    };
    (target <= current_len).then_some(target)
}

impl ChangeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an entry and returns its zero-based index.
    pub fn append(&mut self, entry: JournalEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// The index of the last entry, or [`EMPTY_SNAPSHOT`] when the log is
    /// empty.
    pub fn take_snapshot(&self) -> Snapshot {
        self.entries
            .len()
            .checked_sub(1)
            .map_or(EMPTY_SNAPSHOT, |idx| idx as Snapshot)
    }

    /// Truncates the log to the snapshot boundary, inverting every
    /// non-`just_cache` entry in the reverted tail through `on_revert` and
    /// preserving `just_cache` entries whose key was not otherwise mutated
    /// in that tail (§4.A).
    pub fn restore<E>(
        &mut self,
        snapshot: Snapshot,
        mut on_revert: impl FnMut(&JournalEntry) -> Result<(), E>,
    ) -> Result<(), JournalError<E>> {
        let target = target_length(snapshot, self.entries.len())
            .ok_or(JournalError::InvalidSnapshot(snapshot))?;

        let mut changed_keys: FxHashSet<JournalKey> = FxHashSet::default();
        for entry in &self.entries[target..] {
            if entry.tag != Tag::JustCache {
                changed_keys.insert(entry.key);
            }
        }

        let mut kept_keys: FxHashSet<JournalKey> = FxHashSet::default();
        let mut kept_reversed: Vec<JournalEntry> = Vec::new();
        for entry in self.entries[target..].iter().rev() {
            match entry.tag {
                Tag::JustCache => {
                    if changed_keys.contains(&entry.key) || kept_keys.contains(&entry.key) {
                        continue;
                    }
                    kept_keys.insert(entry.key);
                    kept_reversed.push(entry.clone());
                }
                _ => on_revert(entry).map_err(JournalError::CallbackFailed)?,
            }
        }

        let reverted = self.entries.len() - target;
        self.entries.truncate(target);
        for entry in kept_reversed.into_iter().rev() {
            self.entries.push(entry);
        }
        debug!(
            snapshot,
            reverted,
            kept_just_cache = self.entries.len() - target,
            "journal restored"
        );
        Ok(())
    }

    /// Truncates the log to the snapshot boundary without inverting
    /// entries; `on_commit` fires once per distinct key in the committed
    /// tail, most-recent entry first (§4.A).
    pub fn commit<E>(
        &mut self,
        snapshot: Snapshot,
        mut on_commit: impl FnMut(&JournalEntry) -> Result<(), E>,
    ) -> Result<(), JournalError<E>> {
        let target = target_length(snapshot, self.entries.len())
            .ok_or(JournalError::InvalidSnapshot(snapshot))?;

        let mut committed_keys: FxHashSet<JournalKey> = FxHashSet::default();
        for entry in self.entries[target..].iter().rev() {
            if committed_keys.insert(entry.key) {
                on_commit(entry).map_err(JournalError::CallbackFailed)?;
            }
        }

        self.entries.truncate(target);
        debug!(snapshot, keys = committed_keys.len(), "journal committed");
        Ok(())
    }

    /// Empties the log unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// A snapshot copy of the current entries, for inspection.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
