/// Per-request caps a peer's client family is assumed to tolerate (§4.E).
/// These mirror real eth/6x wire limits rather than protocol-mandated
/// maxima — peers are free to serve less, never more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerLimits {
    pub max_headers: u64,
    pub max_bodies: u64,
    pub max_receipts: u64,
}

const BESU: PeerLimits = PeerLimits {
    max_headers: 512,
    max_bodies: 128,
    max_receipts: 256,
};

const GETH_FAMILY: PeerLimits = PeerLimits {
    max_headers: 192,
    max_bodies: 128,
    max_receipts: 256,
};

const NETHERMIND: PeerLimits = PeerLimits {
    max_headers: 512,
    max_bodies: 256,
    max_receipts: 256,
};

const PARITY_FAMILY: PeerLimits = PeerLimits {
    max_headers: 1024,
    max_bodies: 256,
    max_receipts: 256,
};

const UNKNOWN: PeerLimits = PeerLimits {
    max_headers: 192,
    max_bodies: 32,
    max_receipts: 128,
};

/// Extracts the client family token from a client id string
/// (`"Geth/v1.15.11-stable/linux-amd64/go1.23.4"` -> `"geth"`) and looks up
/// its request-size limits. Unrecognized or malformed ids fall back to the
/// conservative [`UNKNOWN`] limits rather than erroring — a peer's
/// self-reported identity is untrusted input, not a protocol violation.
pub fn peer_limits(client_id: &str) -> PeerLimits {
    let trimmed = client_id.trim().to_lowercase();
    let family = trimmed.split('/').next().unwrap_or("");
    match family {
        "besu" => BESU,
        "geth" | "trinity" | "erigon" | "reth" => GETH_FAMILY,
        "nethermind" => NETHERMIND,
        "openethereum" | "parity" | "parity-ethereum" => PARITY_FAMILY,
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geth_prefix_matches_full_client_id() {
        assert_eq!(
            peer_limits("Geth/v1.15.11-stable/linux-amd64/go1.23.4"),
            GETH_FAMILY
        );
    }

    #[test]
    fn nethermind_is_case_insensitive() {
        assert_eq!(peer_limits("NETHERMIND/v1.29.0"), NETHERMIND);
    }

    #[test]
    fn parity_ethereum_maps_to_parity_family() {
        assert_eq!(peer_limits("parity-ethereum/v2.7.2"), PARITY_FAMILY);
    }

    #[test]
    fn unrecognized_client_falls_back_to_unknown() {
        assert_eq!(peer_limits("some-custom-client/v0.0.1"), UNKNOWN);
    }

    #[test]
    fn whitespace_is_trimmed_before_matching() {
        assert_eq!(peer_limits("  besu/v24.1.0  "), BESU);
    }
}
