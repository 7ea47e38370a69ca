//! One-way digests of sensitive submission fields.

use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Digest of an email address.
///
/// Hashes the bytes it is given. Validation has already lowercased the
/// domain, so addresses differing only in domain case share a digest.
#[must_use]
pub fn hash_email(email: &str) -> String {
    sha256_hex(email)
}

/// Digest of the decimal string form of an age.
#[must_use]
pub fn hash_age(age: u8) -> String {
    sha256_hex(&age.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty_input() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_email("jo@example.com"), hash_email("jo@example.com"));
        assert_ne!(hash_email("jo@example.com"), hash_email("al@example.com"));
    }

    #[test]
    fn test_hash_email_preserves_case() {
        assert_ne!(hash_email("Jo@Example.com"), hash_email("jo@example.com"));
    }

    #[test]
    fn test_hash_age_uses_decimal_string() {
        assert_eq!(hash_age(30), sha256_hex("30"));
        assert_eq!(hash_age(120), sha256_hex("120"));
    }

    #[test]
    fn test_digest_shape() {
        let hash = hash_email("jo@example.com");
        assert_eq!(hash.len(), 64);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert!(!hash.contains("jo@example.com"));
    }
}
