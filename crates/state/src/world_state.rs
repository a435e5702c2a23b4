use std::convert::Infallible;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use evmstate_common::{Account, Address, Bytes, Bytes32};
use evmstate_journal::{ChangeJournal, JournalEntry, JournalKey, JournalValue, Snapshot, Tag};

use crate::error::WorldStateError;

/// A snapshot taken on the world state's own stack: the public id handed to
/// callers, the journal index it maps to, and the length the
/// original-storage journal had at the time (§4.B "Snapshots").
#[derive(Debug, Clone, Copy)]
struct WorldStateSnapshot {
    id: u64,
    journal_snapshot: Snapshot,
    original_storage_journal_length: usize,
}

/// Accounts, contract code, and persistent storage layered atop the change
/// journal, with created-account tracking and EIP-2200 original-value
/// capture (§4.B).
#[derive(Debug, Default)]
pub struct WorldState {
    accounts: FxHashMap<Address, Account>,
    code: FxHashMap<Address, Bytes>,
    storage: FxHashMap<Address, FxHashMap<Bytes32, Bytes32>>,

    created_accounts: FxHashSet<Address>,
    original_storage: FxHashMap<Address, FxHashMap<Bytes32, Bytes32>>,
    original_storage_journal: Vec<(Address, Bytes32)>,

    journal: ChangeJournal,
    snapshots: Vec<WorldStateSnapshot>,
    next_snapshot_id: u64,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- reads ----

    pub fn get_account_optional(&self, addr: Address) -> Option<Account> {
        self.accounts.get(&addr).copied()
    }

    pub fn get_account(&self, addr: Address) -> Account {
        self.get_account_optional(addr).unwrap_or_default()
    }

    pub fn has_account(&self, addr: Address) -> bool {
        self.accounts.contains_key(&addr)
    }

    /// EIP-161: present and empty (zero nonce, zero balance, no code).
    pub fn account_exists_and_is_empty(&self, addr: Address) -> bool {
        self.get_account_optional(addr)
            .is_some_and(|account| account.is_empty())
    }

    pub fn get_code(&self, addr: Address) -> Bytes {
        self.code.get(&addr).cloned().unwrap_or_default()
    }

    fn raw_storage(&self, addr: Address, slot: Bytes32) -> Bytes32 {
        self.storage
            .get(&addr)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or_else(Bytes32::zero)
    }

    /// Reads the current value, recording the original-value capture for
    /// this slot if this is the first observation in the outer transaction.
    pub fn get_storage(&mut self, addr: Address, slot: Bytes32) -> Bytes32 {
        self.capture_original(addr, slot);
        self.raw_storage(addr, slot)
    }

    /// EIP-2200 original value: the value held at first observation in the
    /// current outer transaction, or the current value if never observed
    /// yet. Always zero for accounts created in the current outer
    /// transaction.
    pub fn get_storage_original(&self, addr: Address, slot: Bytes32) -> Bytes32 {
        if self.created_accounts.contains(&addr) {
            return Bytes32::zero();
        }
        self.original_storage
            .get(&addr)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or_else(|| self.raw_storage(addr, slot))
    }

    // ---- writes ----

    /// `None` deletes the account (and its code). Absent-to-absent,
    /// present-to-equal, and delete-of-absent are all no-ops.
    pub fn set_account(&mut self, addr: Address, account: Option<Account>) {
        match account {
            None => {
                if let Some(previous) = self.accounts.remove(&addr) {
                    self.journal.append(JournalEntry::delete(
                        JournalKey::Account(addr),
                        JournalValue::Account(Some(previous)),
                    ));
                    self.set_code(addr, Bytes::new());
                }
            }
            Some(new) => match self.accounts.get(&addr).copied() {
                None => {
                    self.accounts.insert(addr, new);
                    self.journal
                        .append(JournalEntry::create(JournalKey::Account(addr)));
                }
                Some(previous) if previous == new => {}
                Some(previous) => {
                    self.accounts.insert(addr, new);
                    self.journal.append(JournalEntry::update(
                        JournalKey::Account(addr),
                        JournalValue::Account(Some(previous)),
                    ));
                }
            },
        }
    }

    /// Empty code deletes; equal code is a no-op.
    pub fn set_code(&mut self, addr: Address, code: Bytes) {
        if code.is_empty() {
            if let Some(previous) = self.code.remove(&addr) {
                self.journal.append(JournalEntry::delete(
                    JournalKey::Code(addr),
                    JournalValue::Code(Some(previous)),
                ));
            }
            return;
        }
        match self.code.get(&addr).cloned() {
            None => {
                self.code.insert(addr, code);
                self.journal
                    .append(JournalEntry::create(JournalKey::Code(addr)));
            }
            Some(previous) if previous == code => {}
            Some(previous) => {
                self.code.insert(addr, code);
                self.journal.append(JournalEntry::update(
                    JournalKey::Code(addr),
                    JournalValue::Code(Some(previous)),
                ));
            }
        }
    }

    /// Clears storage then deletes the account (and its code).
    pub fn destroy_account(&mut self, addr: Address) {
        if let Some(slots) = self.storage.remove(&addr) {
            for (slot, value) in slots {
                self.journal.append(JournalEntry::delete(
                    JournalKey::Storage(addr, slot),
                    JournalValue::Storage(value),
                ));
            }
        }
        self.set_account(addr, None);
    }

    /// EIP-161: delete every touched account that exists and is empty, in
    /// the iteration order of `touched`.
    pub fn destroy_touched_empty_accounts(&mut self, touched: impl IntoIterator<Item = Address>) {
        for addr in touched {
            if self.account_exists_and_is_empty(addr) {
                self.destroy_account(addr);
            }
        }
    }

    pub fn mark_account_created(&mut self, addr: Address) {
        self.created_accounts.insert(addr);
    }

    pub fn was_account_created(&self, addr: Address) -> bool {
        self.created_accounts.contains(&addr)
    }

    /// Fails with `MissingAccount` if no account is present; otherwise
    /// journals per the zero/present encoding in §4.B.
    pub fn set_storage(
        &mut self,
        addr: Address,
        slot: Bytes32,
        value: Bytes32,
    ) -> Result<(), WorldStateError> {
        if !self.has_account(addr) {
            return Err(WorldStateError::MissingAccount(addr));
        }
        self.capture_original(addr, slot);

        let previous = self.raw_storage(addr, slot);
        if previous == value {
            return Ok(());
        }

        if value.is_zero() {
            self.journal.append(JournalEntry::delete(
                JournalKey::Storage(addr, slot),
                JournalValue::Storage(previous),
            ));
            self.remove_storage_slot(addr, slot);
        } else if previous.is_zero() {
            self.journal
                .append(JournalEntry::create(JournalKey::Storage(addr, slot)));
            self.storage.entry(addr).or_default().insert(slot, value);
        } else {
            self.journal.append(JournalEntry::update(
                JournalKey::Storage(addr, slot),
                JournalValue::Storage(previous),
            ));
            self.storage.entry(addr).or_default().insert(slot, value);
        }
        Ok(())
    }

    fn remove_storage_slot(&mut self, addr: Address, slot: Bytes32) {
        if let Some(slots) = self.storage.get_mut(&addr) {
            slots.remove(&slot);
            if slots.is_empty() {
                self.storage.remove(&addr);
            }
        }
    }

    /// Records the original value for `(addr, slot)` on first observation
    /// in the current outer transaction. A no-op outside a transaction, or
    /// for a created account, or once already captured.
    fn capture_original(&mut self, addr: Address, slot: Bytes32) {
        if self.snapshots.is_empty() || self.created_accounts.contains(&addr) {
            return;
        }
        let already_captured = self
            .original_storage
            .get(&addr)
            .is_some_and(|slots| slots.contains_key(&slot));
        if already_captured {
            return;
        }
        let current = self.raw_storage(addr, slot);
        self.original_storage
            .entry(addr)
            .or_default()
            .insert(slot, current);
        self.original_storage_journal.push((addr, slot));
    }

    // ---- snapshots ----

    /// Opens a snapshot. Opening the outermost snapshot (the stack was
    /// empty) is the canonical point where a new outer transaction begins:
    /// `created_accounts` and `original_storage` are cleared first.
    pub fn take_snapshot(&mut self) -> u64 {
        if self.snapshots.is_empty() {
            self.created_accounts.clear();
            self.original_storage.clear();
            self.original_storage_journal.clear();
        }
        let id = self.next_snapshot_id;
        self.next_snapshot_id = self.next_snapshot_id.wrapping_add(1);
        self.snapshots.push(WorldStateSnapshot {
            id,
            journal_snapshot: self.journal.take_snapshot(),
            original_storage_journal_length: self.original_storage_journal.len(),
        });
        debug!(id, "world state snapshot taken");
        id
    }

    /// Restores the world state to the state it had when `id` was taken,
    /// dropping `id` and any nested snapshots above it.
    pub fn restore_snapshot(&mut self, id: u64) -> Result<(), WorldStateError> {
        let idx = self.snapshot_index(id)?;
        let snapshot = self.snapshots[idx];

        let mut journal = std::mem::take(&mut self.journal);
        let result = journal.restore(snapshot.journal_snapshot, |entry| self.apply_revert(entry));
        self.journal = journal;
        result.map_err(WorldStateError::from_journal_error)?;

        self.truncate_original_storage(snapshot.original_storage_journal_length);
        self.snapshots.truncate(idx);
        if self.snapshots.is_empty() {
            self.created_accounts.clear();
            self.original_storage.clear();
            self.original_storage_journal.clear();
        }
        debug!(id, "world state snapshot restored");
        Ok(())
    }

    /// Folds the snapshot into its parent without inverting entries,
    /// dropping `id` and any nested snapshots above it.
    pub fn commit_snapshot(&mut self, id: u64) -> Result<(), WorldStateError> {
        let idx = self.snapshot_index(id)?;
        let snapshot = self.snapshots[idx];

        let mut journal = std::mem::take(&mut self.journal);
        let result = journal.commit(snapshot.journal_snapshot, |_entry| {
            Ok::<(), Infallible>(())
        });
        self.journal = journal;
        result.map_err(WorldStateError::from_journal_error)?;

        self.snapshots.truncate(idx);
        if self.snapshots.is_empty() {
            self.created_accounts.clear();
            self.original_storage.clear();
            self.original_storage_journal.clear();
        }
        debug!(id, "world state snapshot committed");
        Ok(())
    }

    fn snapshot_index(&self, id: u64) -> Result<usize, WorldStateError> {
        self.snapshots
            .iter()
            .position(|snapshot| snapshot.id == id)
            .ok_or(WorldStateError::UnknownSnapshot(id))
    }

    fn truncate_original_storage(&mut self, length: usize) {
        while self.original_storage_journal.len() > length {
            let Some((addr, slot)) = self.original_storage_journal.pop() else {
                break;
            };
            if let Some(slots) = self.original_storage.get_mut(&addr) {
                slots.remove(&slot);
                if slots.is_empty() {
                    self.original_storage.remove(&addr);
                }
            }
        }
    }

    /// Reconstitutes map state for a single reverted journal entry.
    /// `just_cache` entries never reach here — the journal filters them out
    /// of the revert callback before this is called.
    fn apply_revert(&mut self, entry: &JournalEntry) -> Result<(), Infallible> {
        match entry.key {
            JournalKey::Account(addr) => match entry.tag {
                Tag::Create => {
                    self.accounts.remove(&addr);
                }
                Tag::Update | Tag::Delete => {
                    if let Some(JournalValue::Account(previous)) = &entry.value {
                        match previous {
                            Some(account) => {
                                self.accounts.insert(addr, *account);
                            }
                            None => {
                                self.accounts.remove(&addr);
                            }
                        }
                    }
                }
                Tag::Touch | Tag::JustCache => {}
            },
            JournalKey::Code(addr) => match entry.tag {
                Tag::Create => {
                    self.code.remove(&addr);
                }
                Tag::Update | Tag::Delete => {
                    if let Some(JournalValue::Code(previous)) = &entry.value {
                        match previous {
                            Some(code) => {
                                self.code.insert(addr, code.clone());
                            }
                            None => {
                                self.code.remove(&addr);
                            }
                        }
                    }
                }
                Tag::Touch | Tag::JustCache => {}
            },
            JournalKey::Storage(addr, slot) => match entry.tag {
                Tag::Create => self.remove_storage_slot(addr, slot),
                Tag::Update | Tag::Delete => {
                    if let Some(JournalValue::Storage(previous)) = &entry.value {
                        if previous.is_zero() {
                            self.remove_storage_slot(addr, slot);
                        } else {
                            self.storage.entry(addr).or_default().insert(slot, *previous);
                        }
                    }
                }
                Tag::Touch | Tag::JustCache => {}
            },
        }
        Ok(())
    }

    /// Empties every map and stack. Idempotent and unconditional.
    pub fn clear(&mut self) {
        self.accounts.clear();
        self.code.clear();
        self.storage.clear();
        self.created_accounts.clear();
        self.original_storage.clear();
        self.original_storage_journal.clear();
        self.journal.clear();
        self.snapshots.clear();
    }
}
