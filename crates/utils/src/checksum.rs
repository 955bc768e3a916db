use sha2::{Digest, Sha256};

pub const CHECKSUM_HEX_LEN: usize = 64;

/// SHA-256 of `data`, lowercase hex (64 chars)
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Checksums are 64 hex characters, case-insensitive
pub fn is_valid_checksum(value: &str) -> bool {
    value.len() == CHECKSUM_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            compute_sha256(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(compute_sha256(b"").len(), CHECKSUM_HEX_LEN);
    }

    #[test]
    fn test_checksum_validation() {
        assert!(is_valid_checksum(&compute_sha256(b"jquery")));
        assert!(is_valid_checksum(&"AB".repeat(32)));
        assert!(!is_valid_checksum(&"zz".repeat(32)));
        assert!(!is_valid_checksum("abc123"));
    }
}
