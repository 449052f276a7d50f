//! [`SecretKey`]: the process-wide file encryption key.
//!
//! Parsed once at startup from the hex-encoded `SECRET_KEY_HEX` setting and
//! handed to [`EnvelopeCodec::new`](super::EnvelopeCodec::new). Never logged.

use thiserror::Error;
use zeroize::Zeroize;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Number of hex characters that encode a [`KEY_LEN`]-byte key.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Errors produced while loading the secret key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// No key material was supplied.
    #[error("secret key is missing")]
    Missing,

    /// The hex string has the wrong number of characters.
    #[error("secret key must be {KEY_HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),

    /// The string contains non-hex characters.
    #[error("secret key is not valid hex")]
    InvalidHex,
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Wiped with [`Zeroize`] on drop, so the bytes are cleared even in
/// optimised builds.
#[derive(Clone)]
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Parse a key from its 64-character hex representation.
    ///
    /// Surrounding whitespace is ignored; upper- and lower-case digits are
    /// both accepted.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the string is empty, has the wrong length, or
    /// is not valid hex.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyError::Missing);
        }
        if s.len() != KEY_HEX_LEN {
            return Err(KeyError::InvalidLength(s.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        hex::decode_to_slice(s, &mut buf[..]).map_err(|_| KeyError::InvalidHex)?;
        Ok(Self(buf))
    }

    /// Wrap raw key bytes.
    #[cfg(test)]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn parses_valid_hex() {
        let key = SecretKey::from_hex(VALID).unwrap();
        assert_eq!(key.as_bytes()[0], 0x00);
        assert_eq!(key.as_bytes()[31], 0x1f);
    }

    #[test]
    fn accepts_upper_case_and_whitespace() {
        let upper = format!("  {}\n", VALID.to_uppercase());
        let key = SecretKey::from_hex(&upper).unwrap();
        assert_eq!(key.as_bytes()[10], 0x0a);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(SecretKey::from_hex("").unwrap_err(), KeyError::Missing);
        assert_eq!(SecretKey::from_hex("   ").unwrap_err(), KeyError::Missing);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            SecretKey::from_hex(&VALID[..62]).unwrap_err(),
            KeyError::InvalidLength(62)
        );
        let long = format!("{VALID}00");
        assert_eq!(SecretKey::from_hex(&long).unwrap_err(), KeyError::InvalidLength(66));
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("zz{}", &VALID[2..]);
        assert_eq!(SecretKey::from_hex(&bad).unwrap_err(), KeyError::InvalidHex);
    }

    #[test]
    fn zeroize_clears_key_bytes() {
        let mut key = SecretKey::from_hex(VALID).unwrap();
        key.0.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = SecretKey::from_hex(VALID).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("0a0b"));
    }
}
