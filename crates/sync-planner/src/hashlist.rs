use evmstate_common::BlockHash;

use crate::error::PlannerError;
use crate::limits::peer_limits;
use crate::request_id::RequestIdState;

/// One `GetBlockBodies` batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BodiesBatch {
    pub request_id: Option<u64>,
    pub block_hashes: Vec<BlockHash>,
}

/// One `GetReceipts` batch. `first_block_receipt_index` is only meaningful
/// on eth/70+, which frames receipts as a flat, block-boundary-annotated
/// list rather than one list-of-lists per block (§4.E).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReceiptsBatch {
    pub request_id: Option<u64>,
    pub first_block_receipt_index: Option<u64>,
    pub block_hashes: Vec<BlockHash>,
}

pub struct HashListRequestInput {
    pub peer_client_id: String,
    pub protocol_version: i64,
    pub block_hashes: Vec<BlockHash>,
    pub initial_request_id: Option<i128>,
}

fn validate_protocol_version(version: i64) -> Result<u8, PlannerError> {
    if (0..=70).contains(&version) {
        Ok(version as u8)
    } else {
        Err(PlannerError::InvalidProtocolVersion {
            field: "protocol_version".to_string(),
        })
    }
}

/// Splits `block_hashes` into contiguous chunks no larger than the peer's
/// `max_bodies` limit, one `GetBlockBodies` batch per chunk (§4.E).
pub fn plan_body_request(input: HashListRequestInput) -> Result<Vec<BodiesBatch>, PlannerError> {
    let protocol_version = validate_protocol_version(input.protocol_version)?;
    let limits = peer_limits(&input.peer_client_id);
    if limits.max_bodies == 0 {
        return Err(PlannerError::InvalidPeerLimit {
            field: "max_bodies".to_string(),
        });
    }

    let mut request_ids = RequestIdState::new(
        super::supports_request_id(protocol_version),
        input.initial_request_id,
        "initial_request_id",
    )?;

    Ok(chunk(&input.block_hashes, limits.max_bodies as usize)
        .into_iter()
        .map(|chunk| BodiesBatch {
            request_id: request_ids.pop(),
            block_hashes: chunk.to_vec(),
        })
        .collect())
}

/// Splits `block_hashes` into contiguous chunks no larger than the peer's
/// `max_receipts` limit, one `GetReceipts` batch per chunk. Every batch's
/// `first_block_receipt_index` is `Some(0)` on eth/70+, since each batch
/// always starts at the first receipt of its first block; it is `None`
/// below eth/70, where the field does not exist on the wire.
pub fn plan_receipt_request(
    input: HashListRequestInput,
) -> Result<Vec<ReceiptsBatch>, PlannerError> {
    let protocol_version = validate_protocol_version(input.protocol_version)?;
    let limits = peer_limits(&input.peer_client_id);
    if limits.max_receipts == 0 {
        return Err(PlannerError::InvalidPeerLimit {
            field: "max_receipts".to_string(),
        });
    }

    let mut request_ids = RequestIdState::new(
        super::supports_request_id(protocol_version),
        input.initial_request_id,
        "initial_request_id",
    )?;
    let supports_partial_receipts = super::supports_partial_receipts(protocol_version);

    Ok(chunk(&input.block_hashes, limits.max_receipts as usize)
        .into_iter()
        .map(|chunk| ReceiptsBatch {
            request_id: request_ids.pop(),
            first_block_receipt_index: supports_partial_receipts.then_some(0),
            block_hashes: chunk.to_vec(),
        })
        .collect())
}

fn chunk(hashes: &[BlockHash], size: usize) -> Vec<&[BlockHash]> {
    if hashes.is_empty() {
        return Vec::new();
    }
    hashes.chunks(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmstate_common::H256;

    fn hashes(n: usize) -> Vec<BlockHash> {
        (0..n).map(|i| H256::from_low_u64_be(i as u64)).collect()
    }

    #[test]
    fn receipts_with_partial_receipts_framing_for_nethermind_peer() {
        let batches = plan_receipt_request(HashListRequestInput {
            peer_client_id: "Nethermind/v1.29.0".to_string(),
            protocol_version: 70,
            block_hashes: hashes(300),
            initial_request_id: Some(100),
        })
        .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].request_id, Some(100));
        assert_eq!(batches[0].first_block_receipt_index, Some(0));
        assert_eq!(batches[0].block_hashes.len(), 256);
        assert_eq!(batches[1].request_id, Some(101));
        assert_eq!(batches[1].first_block_receipt_index, Some(0));
        assert_eq!(batches[1].block_hashes.len(), 44);
    }

    #[test]
    fn receipts_below_eth70_omit_partial_receipt_index() {
        let batches = plan_receipt_request(HashListRequestInput {
            peer_client_id: "Nethermind/v1.29.0".to_string(),
            protocol_version: 69,
            block_hashes: hashes(10),
            initial_request_id: Some(0),
        })
        .unwrap();
        assert!(batches.iter().all(|b| b.first_block_receipt_index.is_none()));
    }

    #[test]
    fn bodies_chunk_by_peer_family_limit() {
        let batches = plan_body_request(HashListRequestInput {
            peer_client_id: "besu/v24.1.0".to_string(),
            protocol_version: 68,
            block_hashes: hashes(200),
            initial_request_id: Some(5),
        })
        .unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].block_hashes.len(), 128);
        assert_eq!(batches[1].block_hashes.len(), 72);
        assert_eq!(batches[0].request_id, Some(5));
        assert_eq!(batches[1].request_id, Some(6));
    }

    #[test]
    fn empty_hash_list_yields_no_batches() {
        let batches = plan_body_request(HashListRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 68,
            block_hashes: Vec::new(),
            initial_request_id: Some(0),
        })
        .unwrap();
        assert!(batches.is_empty());
    }
}
