//! SHA-256 transport checksum over stored envelopes.

use sha2::{Digest as _, Sha256};

use super::envelope::IntegrityError;

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Recompute the checksum of `bytes` and compare it with `expected`.
///
/// # Errors
///
/// Returns [`IntegrityError::ChecksumMismatch`] if the digests differ.
pub fn verify_checksum(bytes: &[u8], expected: &str) -> Result<(), IntegrityError> {
    let actual = sha256_hex(bytes);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(IntegrityError::ChecksumMismatch {
            expected: expected.to_owned(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_changes_with_any_byte() {
        let data = vec![7u8; 64];
        let base = sha256_hex(&data);
        assert_eq!(base, sha256_hex(&data));
        for i in [0, 31, 63] {
            let mut altered = data.clone();
            altered[i] ^= 0x80;
            assert_ne!(sha256_hex(&altered), base);
        }
    }

    #[test]
    fn verify_accepts_matching_and_rejects_other() {
        let sum = sha256_hex(b"envelope");
        assert!(verify_checksum(b"envelope", &sum).is_ok());
        assert!(verify_checksum(b"envelope", &sum.to_uppercase()).is_ok());

        let err = verify_checksum(b"envelopf", &sum).unwrap_err();
        assert!(matches!(err, IntegrityError::ChecksumMismatch { ref expected, .. } if *expected == sum));
    }
}
