use crate::error::PlannerError;
use crate::limits::peer_limits;
use crate::request_id::RequestIdState;

/// One `GetBlockHeaders` batch ready to go out on the wire (§4.E). Field
/// names mirror the eth/66+ message shape rather than the planner's own
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeaderBatch {
    pub request_id: Option<u64>,
    pub start_block_number: u64,
    pub limit: u64,
    pub skip: u64,
    pub reverse: bool,
}

/// The largest `skip` a caller may supply. Chosen to match
/// `Number.MAX_SAFE_INTEGER`, the bound the original sync planner enforced
/// on every numeric wire field.
const MAX_SAFE_INTEGER: i128 = (1i128 << 53) - 1;

pub struct HeaderRequestInput {
    pub peer_client_id: String,
    pub protocol_version: i64,
    pub start_block_number: i128,
    pub total_headers: i128,
    pub skip: i128,
    pub reverse: bool,
    pub initial_request_id: Option<i128>,
}

/// Splits a header range into peer-sized batches, walking forward or
/// backward from `start_block_number` depending on `reverse` (§4.E).
///
/// Each batch's `limit` is capped at the peer family's `max_headers`; the
/// next batch's `start_block_number` is offset by `limit * (skip + 1)` in
/// the direction of travel. A reverse range that would walk past block 0
/// before exhausting `total_headers` is rejected up front rather than
/// silently clamped.
pub fn plan_header_request(input: HeaderRequestInput) -> Result<Vec<HeaderBatch>, PlannerError> {
    let protocol_version = validate_protocol_version(input.protocol_version)?;

    if input.total_headers < 0 || input.total_headers > u64::MAX as i128 {
        return Err(PlannerError::InvalidTotalHeaders {
            field: "total_headers".to_string(),
        });
    }
    if input.start_block_number < 0 || input.start_block_number > u64::MAX as i128 {
        return Err(PlannerError::InvalidStartBlockNumber {
            field: "start_block_number".to_string(),
        });
    }
    if input.skip < 0 || input.skip > MAX_SAFE_INTEGER {
        return Err(PlannerError::InvalidSkip {
            field: "skip".to_string(),
        });
    }

    let total_headers = input.total_headers as u64;
    let start_block_number = input.start_block_number as u64;
    let skip = input.skip as u64;

    if input.reverse && total_headers > 0 {
        let deepest_offset = (total_headers as u128 - 1) * (skip as u128 + 1);
        if deepest_offset > start_block_number as u128 {
            return Err(PlannerError::HeaderRangeUnderflow {
                field: "start_block_number".to_string(),
            });
        }
    }

    let limits = peer_limits(&input.peer_client_id);
    if limits.max_headers == 0 {
        return Err(PlannerError::InvalidPeerLimit {
            field: "max_headers".to_string(),
        });
    }

    let supports_request_id = super::supports_request_id(protocol_version);
    let mut request_ids = RequestIdState::new(
        supports_request_id,
        input.initial_request_id,
        "initial_request_id",
    )?;

    let mut batches = Vec::new();
    let mut remaining = total_headers;
    let mut current_start = start_block_number;
    let stride = (skip as u128 + 1).min(u64::MAX as u128) as u64;

    while remaining > 0 {
        let limit = remaining.min(limits.max_headers);
        batches.push(HeaderBatch {
            request_id: request_ids.pop(),
            start_block_number: current_start,
            limit,
            skip,
            reverse: input.reverse,
        });

        let advance = limit.saturating_mul(stride);
        current_start = if input.reverse {
            current_start.saturating_sub(advance)
        } else {
            current_start.saturating_add(advance)
        };
        remaining -= limit;
    }

    Ok(batches)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_header_request_chunks_for_geth_peer() {
        let batches = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 69,
            start_block_number: 999,
            total_headers: 450,
            skip: 0,
            reverse: true,
            initial_request_id: Some(42),
        })
        .unwrap();

        assert_eq!(
            batches,
            vec![
                HeaderBatch {
                    request_id: Some(42),
                    start_block_number: 999,
                    limit: 192,
                    skip: 0,
                    reverse: true,
                },
                HeaderBatch {
                    request_id: Some(43),
                    start_block_number: 807,
                    limit: 192,
                    skip: 0,
                    reverse: true,
                },
                HeaderBatch {
                    request_id: Some(44),
                    start_block_number: 615,
                    limit: 66,
                    skip: 0,
                    reverse: true,
                },
            ]
        );
    }

    #[test]
    fn forward_range_with_skip_advances_by_stride() {
        let batches = plan_header_request(HeaderRequestInput {
            peer_client_id: "besu/v24.1.0".to_string(),
            protocol_version: 68,
            start_block_number: 0,
            total_headers: 4,
            skip: 1,
            reverse: false,
            initial_request_id: Some(0),
        })
        .unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].limit, 4);
        assert_eq!(batches[0].skip, 1);
    }

    #[test]
    fn reverse_range_walking_past_genesis_underflows() {
        let err = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 68,
            start_block_number: 10,
            total_headers: 20,
            skip: 0,
            reverse: true,
            initial_request_id: Some(0),
        })
        .unwrap_err();
        assert_eq!(
            err,
            PlannerError::HeaderRangeUnderflow {
                field: "start_block_number".to_string()
            }
        );
    }

    #[test]
    fn protocol_version_below_66_never_emits_request_ids() {
        let batches = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 65,
            start_block_number: 100,
            total_headers: 10,
            skip: 0,
            reverse: false,
            initial_request_id: None,
        })
        .unwrap();
        assert!(batches.iter().all(|b| b.request_id.is_none()));
    }

    #[test]
    fn total_headers_beyond_u64_range_errors_instead_of_truncating() {
        let err = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 68,
            start_block_number: 0,
            total_headers: u64::MAX as i128 + 5,
            skip: 0,
            reverse: false,
            initial_request_id: Some(0),
        })
        .unwrap_err();
        assert_eq!(
            err,
            PlannerError::InvalidTotalHeaders {
                field: "total_headers".to_string()
            }
        );
    }

    #[test]
    fn protocol_version_out_of_range_errors() {
        let err = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 71,
            start_block_number: 0,
            total_headers: 1,
            skip: 0,
            reverse: false,
            initial_request_id: Some(0),
        })
        .unwrap_err();
        assert_eq!(
            err,
            PlannerError::InvalidProtocolVersion {
                field: "protocol_version".to_string()
            }
        );
    }

    #[test]
    fn missing_request_id_errors_when_protocol_requires_it() {
        let err = plan_header_request(HeaderRequestInput {
            peer_client_id: "Geth/v1.15.11-stable".to_string(),
            protocol_version: 66,
            start_block_number: 0,
            total_headers: 1,
            skip: 0,
            reverse: false,
            initial_request_id: None,
        })
        .unwrap_err();
        assert_eq!(
            err,
            PlannerError::MissingInitialRequestId {
                field: "initial_request_id".to_string()
            }
        );
    }
}
