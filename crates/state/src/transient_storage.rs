use rustc_hash::FxHashMap;
use tracing::debug;

use evmstate_common::{Address, Bytes32};

use crate::error::TransientStorageError;

/// One mutation recorded for revert purposes: the slot and the value it
/// held before this write.
#[derive(Debug, Clone, Copy)]
struct TransientEntry {
    addr: Address,
    slot: Bytes32,
    previous_value: Bytes32,
}

#[derive(Debug, Clone, Copy)]
struct TransientSnapshot {
    id: u64,
    journal_length: usize,
}

/// EIP-1153 per-transaction slot store with its own independent snapshot
/// stack (§4.C). Unlike the world state's journal, there is no `just_cache`
/// preservation here: transient storage semantics are per-slot "most
/// recent write".
#[derive(Debug, Default)]
pub struct TransientStorage {
    storage: FxHashMap<Address, FxHashMap<Bytes32, Bytes32>>,
    journal: Vec<TransientEntry>,
    snapshots: Vec<TransientSnapshot>,
    next_id: u64,
}

impl TransientStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: Address, slot: Bytes32) -> Bytes32 {
        self.storage
            .get(&addr)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or_else(Bytes32::zero)
    }

    /// Zero-clears the slot. A write equal to the current value is a
    /// no-op.
    pub fn set(&mut self, addr: Address, slot: Bytes32, value: Bytes32) {
        let previous = self.get(addr, slot);
        if previous == value {
            return;
        }
        self.journal.push(TransientEntry {
            addr,
            slot,
            previous_value: previous,
        });
        self.write_slot(addr, slot, value);
    }

    fn write_slot(&mut self, addr: Address, slot: Bytes32, value: Bytes32) {
        if value.is_zero() {
            if let Some(slots) = self.storage.get_mut(&addr) {
                slots.remove(&slot);
                if slots.is_empty() {
                    self.storage.remove(&addr);
                }
            }
        } else {
            self.storage.entry(addr).or_default().insert(slot, value);
        }
    }

    pub fn take_snapshot(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.snapshots.push(TransientSnapshot {
            id,
            journal_length: self.journal.len(),
        });
        id
    }

    /// Replays the journal tail from newest to oldest back to the
    /// captured length, applying each previous value.
    pub fn restore_snapshot(&mut self, id: u64) -> Result<(), TransientStorageError> {
        let idx = self.snapshot_index(id)?;
        let target_length = self.snapshots[idx].journal_length;

        while self.journal.len() > target_length {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            self.write_slot(entry.addr, entry.slot, entry.previous_value);
        }

        self.snapshots.truncate(idx);
        if self.snapshots.is_empty() {
            self.clear();
        }
        debug!(id, "transient storage snapshot restored");
        Ok(())
    }

    /// Drops the snapshot and any nested above it without replaying
    /// anything.
    pub fn commit_snapshot(&mut self, id: u64) -> Result<(), TransientStorageError> {
        let idx = self.snapshot_index(id)?;
        self.snapshots.truncate(idx);
        if self.snapshots.is_empty() {
            // Transient storage dies with the outer transaction.
            self.storage.clear();
            self.journal.clear();
        }
        debug!(id, "transient storage snapshot committed");
        Ok(())
    }

    fn snapshot_index(&self, id: u64) -> Result<usize, TransientStorageError> {
        self.snapshots
            .iter()
            .position(|snapshot| snapshot.id == id)
            .ok_or(TransientStorageError::UnknownTransientSnapshot(id))
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.journal.clear();
        self.snapshots.clear();
    }
}
