use crate::error::PlannerError;

/// The largest value a caller may supply for `initial_request_id` — request
/// ids are framed on the wire as `u64` (EIP-2481), so anything outside
/// `[0, 2^64)` can never round-trip.
const MAX_REQUEST_ID: i128 = u64::MAX as i128;

/// Hands out sequential `request_id` values for a single planning call,
/// wrapping modulo 2^64 the way a long-lived peer session would after
/// billions of requests (§4.E). Protocol versions below eth/66 never framed
/// a request id at all, so a planner for such a peer always yields `None`.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdState {
    next: Option<u64>,
}

impl RequestIdState {
    pub fn new(
        supports_request_id: bool,
        initial_request_id: Option<i128>,
        field: &str,
    ) -> Result<Self, PlannerError> {
        if !supports_request_id {
            return Ok(Self { next: None });
        }
        match initial_request_id {
            None => Err(PlannerError::MissingInitialRequestId {
                field: field.to_string(),
            }),
            Some(id) if (0..=MAX_REQUEST_ID).contains(&id) => Ok(Self {
                next: Some(id as u64),
            }),
            Some(_) => Err(PlannerError::InvalidInitialRequestId {
                field: field.to_string(),
            }),
        }
    }

    /// Returns the id for the next batch and advances the counter, wrapping
    /// at 2^64. Returns `None` for every call when the peer never supports
    /// request ids.
    pub fn pop(&mut self) -> Option<u64> {
        let id = self.next?;
        self.next = Some(id.wrapping_add(1));
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_peers_never_emit_ids() {
        let mut state = RequestIdState::new(false, None, "initial_request_id").unwrap();
        assert_eq!(state.pop(), None);
        assert_eq!(state.pop(), None);
    }

    #[test]
    fn missing_initial_id_errors_when_supported() {
        assert_eq!(
            RequestIdState::new(true, None, "initial_request_id").unwrap_err(),
            PlannerError::MissingInitialRequestId {
                field: "initial_request_id".to_string()
            }
        );
    }

    #[test]
    fn negative_initial_id_errors() {
        assert_eq!(
            RequestIdState::new(true, Some(-1), "initial_request_id").unwrap_err(),
            PlannerError::InvalidInitialRequestId {
                field: "initial_request_id".to_string()
            }
        );
    }

    #[test]
    fn ids_increment_sequentially() {
        let mut state = RequestIdState::new(true, Some(42), "initial_request_id").unwrap();
        assert_eq!(state.pop(), Some(42));
        assert_eq!(state.pop(), Some(43));
        assert_eq!(state.pop(), Some(44));
    }

    #[test]
    fn ids_wrap_at_u64_max() {
        let mut state = RequestIdState::new(true, Some(MAX_REQUEST_ID), "initial_request_id").unwrap();
        assert_eq!(state.pop(), Some(u64::MAX));
        assert_eq!(state.pop(), Some(0));
    }
}
