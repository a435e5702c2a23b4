//! Primitive types shared by the journal, world-state, and sync-planner
//! crates.
//!
//! This crate plays the role of the "primitives collaborator" described in
//! the state-layer design: it supplies `Address`, `Bytes32`, and `Bytes`,
//! the `Account` record, the two empty-hash constants, and a canonical hex
//! encoder used for journal keying and diagnostics. It computes no hashes of
//! its own — `EMPTY_CODE_HASH`/`EMPTY_STORAGE_ROOT` are fixed constants, not
//! derived at runtime, matching the spec's note that Keccak-256 is consumed
//! only as a source for those two values.

mod account;
mod constants;
mod hexkey;

pub use account::Account;
pub use constants::{EMPTY_CODE_HASH, EMPTY_STORAGE_ROOT};
pub use hexkey::hex_of_bytes;

pub use ethereum_types::{Address, H256};

/// A 32-byte value: storage slots, storage values, code hashes, storage
/// roots, and block hashes all share this representation.
pub type Bytes32 = H256;

/// Variable-length contract runtime code.
pub type Bytes = bytes::Bytes;

/// A block hash, as consumed by the full-sync request planner.
pub type BlockHash = H256;
