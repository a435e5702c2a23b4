//! Full-sync request planner (§4.E): turns a header range or a list of
//! block hashes into peer-sized `GetBlockHeaders` / `GetBlockBodies` /
//! `GetReceipts` batches, honoring the eth/66+ request-id framing
//! (EIP-2481) and the eth/70 partial-receipts framing.
//!
//! The planner never talks to a peer — it only computes what a sync driver
//! should ask for and in what shape, given a protocol version and a
//! self-reported client id.

mod error;
mod hashlist;
mod header;
mod limits;
mod request_id;

pub use error::PlannerError;
pub use hashlist::{plan_body_request, plan_receipt_request, BodiesBatch, HashListRequestInput, ReceiptsBatch};
pub use header::{plan_header_request, HeaderBatch, HeaderRequestInput};
pub use limits::{peer_limits, PeerLimits};

/// eth/66 introduced per-message request ids (EIP-2481).
pub(crate) fn supports_request_id(protocol_version: u8) -> bool {
    protocol_version >= 66
}

/// eth/70 introduced partial-receipts framing.
pub(crate) fn supports_partial_receipts(protocol_version: u8) -> bool {
    protocol_version >= 70
}
