use crate::error::TransactionError;
use crate::transient_storage::TransientStorage;
use crate::world_state::WorldState;

/// Composes a [`WorldState`] and a [`TransientStorage`] into one nestable
/// LIFO begin/commit/rollback unit (§4.D).
///
/// The two stores are manipulated in a fixed order — world state first,
/// transient storage second — for both commit and rollback. Atomicity
/// across the two is not guaranteed: if the transient-storage half errors
/// after the world-state half succeeded, the error surfaces as-is and no
/// compensating action is attempted. This is acceptable because both
/// stores' per-operation failures are limited to an unknown-snapshot error,
/// which only arises from programmer error (mismatched ids).
#[derive(Debug, Default)]
pub struct TransactionBoundary {
    pub world_state: WorldState,
    pub transient_storage: TransientStorage,
    frames: Vec<(u64, u64)>,
}

impl TransactionBoundary {
    pub fn new(world_state: WorldState, transient_storage: TransientStorage) -> Self {
        Self {
            world_state,
            transient_storage,
            frames: Vec::new(),
        }
    }

    /// Opens a frame: takes a snapshot on both stores and pushes the pair.
    pub fn begin_transaction(&mut self) {
        let world_state_snapshot = self.world_state.take_snapshot();
        let transient_storage_snapshot = self.transient_storage.take_snapshot();
        self.frames
            .push((world_state_snapshot, transient_storage_snapshot));
    }

    /// Pops the top frame and commits both captured snapshots.
    pub fn commit_transaction(&mut self) -> Result<(), TransactionError> {
        let (world_state_snapshot, transient_storage_snapshot) =
            self.frames.pop().ok_or(TransactionError::NoActiveTransaction)?;
        self.world_state.commit_snapshot(world_state_snapshot)?;
        self.transient_storage
            .commit_snapshot(transient_storage_snapshot)?;
        Ok(())
    }

    /// Pops the top frame and restores both captured snapshots.
    pub fn rollback_transaction(&mut self) -> Result<(), TransactionError> {
        let (world_state_snapshot, transient_storage_snapshot) =
            self.frames.pop().ok_or(TransactionError::NoActiveTransaction)?;
        self.world_state.restore_snapshot(world_state_snapshot)?;
        self.transient_storage
            .restore_snapshot(transient_storage_snapshot)?;
        Ok(())
    }

    /// The number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Clears both underlying stores and every open frame. Always
    /// available as a recovery path after an error surfaces from a partial
    /// commit/rollback.
    pub fn clear(&mut self) {
        self.world_state.clear();
        self.transient_storage.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmstate_common::{Account, Address, Bytes32};

    #[test]
    fn depth_tracks_open_frames() {
        let mut boundary = TransactionBoundary::default();
        assert_eq!(boundary.depth(), 0);
        boundary.begin_transaction();
        boundary.begin_transaction();
        assert_eq!(boundary.depth(), 2);
        boundary.commit_transaction().unwrap();
        assert_eq!(boundary.depth(), 1);
    }

    #[test]
    fn commit_or_rollback_without_a_frame_errors() {
        let mut boundary = TransactionBoundary::default();
        assert_eq!(
            boundary.commit_transaction().unwrap_err(),
            TransactionError::NoActiveTransaction
        );
        assert_eq!(
            boundary.rollback_transaction().unwrap_err(),
            TransactionError::NoActiveTransaction
        );
    }

    #[test]
    fn rollback_reverts_both_stores_together() {
        let mut boundary = TransactionBoundary::default();
        let addr = Address::repeat_byte(1);
        let slot = Bytes32::repeat_byte(1);

        boundary.world_state.set_account(addr, Some(Account::empty()));
        boundary.begin_transaction();
        boundary
            .world_state
            .set_storage(addr, slot, Bytes32::repeat_byte(7))
            .unwrap();
        boundary.transient_storage.set(addr, slot, Bytes32::repeat_byte(9));

        boundary.rollback_transaction().unwrap();

        assert_eq!(boundary.world_state.get_storage(addr, slot), Bytes32::zero());
        assert_eq!(boundary.transient_storage.get(addr, slot), Bytes32::zero());
        assert_eq!(boundary.depth(), 0);
    }

    #[test]
    fn nested_rollback_leaves_outer_frame_open() {
        let mut boundary = TransactionBoundary::default();
        boundary.begin_transaction();
        boundary.begin_transaction();
        boundary.rollback_transaction().unwrap();
        assert_eq!(boundary.depth(), 1);
    }
}
