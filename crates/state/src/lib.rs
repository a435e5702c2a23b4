//! World state, transient storage, and the transaction boundary that
//! composes them (§4.B, §4.C, §4.D).
//!
//! Built atop [`evmstate_journal`]'s generic change journal: the world
//! state is the only component that understands accounts, code, and
//! storage — the journal itself stays ignorant of what it's logging.

mod error;
mod transaction;
mod transient_storage;
mod world_state;

pub use error::{TransactionError, TransientStorageError, WorldStateError};
pub use transaction::TransactionBoundary;
pub use transient_storage::TransientStorage;
pub use world_state::WorldState;
