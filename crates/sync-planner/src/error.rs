/// Validation errors from the full-sync request planner (§4.E). All
/// validation errors are returned, never thrown, and each carries the name
/// of the offending field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("invalid protocol version for field `{field}`")]
    InvalidProtocolVersion { field: String },
    #[error("invalid total_headers for field `{field}`")]
    InvalidTotalHeaders { field: String },
    #[error("invalid start_block_number for field `{field}`")]
    InvalidStartBlockNumber { field: String },
    #[error("invalid skip for field `{field}`")]
    InvalidSkip { field: String },
    #[error("reverse header range underflows for field `{field}`")]
    HeaderRangeUnderflow { field: String },
    #[error("invalid initial_request_id for field `{field}`")]
    InvalidInitialRequestId { field: String },
    #[error("missing initial_request_id for field `{field}`")]
    MissingInitialRequestId { field: String },
    #[error("invalid peer limit for field `{field}`")]
    InvalidPeerLimit { field: String },
}
