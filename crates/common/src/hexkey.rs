/// Canonical hex encoding used for journal keying and diagnostics.
///
/// Always lowercase, always `0x`-prefixed, never padded or truncated.
pub fn hex_of_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_and_lowercases() {
        assert_eq!(hex_of_bytes(&[0xAB, 0x01]), "0xab01");
        assert_eq!(hex_of_bytes(&[]), "0x");
    }
}
