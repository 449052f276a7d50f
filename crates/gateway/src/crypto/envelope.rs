//! AES-256-GCM encryption of whole files into self-contained envelopes.
//!
//! A fresh 96-bit IV is drawn from the OS CSPRNG for every call, so the same
//! plaintext encrypted twice yields two different envelopes. No associated
//! data is bound; the tag covers the ciphertext only.

use aes_gcm::{
    aead::{AeadCore, AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce, Tag,
};
use thiserror::Error;

use super::key::SecretKey;

/// Byte length of the AES-GCM initialisation vector (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest well-formed envelope: an empty plaintext.
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + TAG_LEN;

/// Errors produced while sealing a plaintext.
#[derive(Debug, Error)]
pub enum CipherError {
    /// AES-GCM refused the input (only possible beyond the GCM length limit).
    #[error("aead encryption failed")]
    SealFailure,
}

/// Stored bytes cannot be trusted.
///
/// Distinct from I/O errors so callers can tell "tampered or corrupted" from
/// "storage unreachable".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// Fewer bytes than an IV plus a tag.
    #[error("envelope too short: {len} bytes, need at least {MIN_ENVELOPE_LEN}")]
    Truncated { len: usize },

    /// The authentication tag did not verify under the configured key.
    #[error("authentication tag mismatch")]
    TagMismatch,

    /// The SHA-256 of the fetched bytes differs from the recorded checksum.
    #[error("checksum mismatch: recorded {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Borrowed view of an envelope split into its three regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParts<'a> {
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
}

impl<'a> EnvelopeParts<'a> {
    /// Split `envelope` into `IV ‖ ciphertext ‖ tag`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::Truncated`] if `envelope` is shorter than
    /// [`MIN_ENVELOPE_LEN`].
    pub fn split(envelope: &'a [u8]) -> Result<Self, IntegrityError> {
        if envelope.len() < MIN_ENVELOPE_LEN {
            return Err(IntegrityError::Truncated {
                len: envelope.len(),
            });
        }
        let (iv, rest) = envelope.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);
        Ok(Self {
            iv,
            ciphertext,
            tag,
        })
    }
}

/// Stateless encoder/decoder bound to one [`SecretKey`].
///
/// The AES key schedule is expanded once here and shared by every call. The
/// raw key is consumed and wiped as soon as the schedule exists.
#[derive(Clone)]
pub struct EnvelopeCodec {
    cipher: Aes256Gcm,
}

impl EnvelopeCodec {
    /// Create a codec that encrypts and decrypts with `key`.
    pub fn new(key: SecretKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt `plaintext` and return `IV ‖ ciphertext ‖ tag`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::SealFailure`] on an internal AEAD error (should
    /// be unreachable for inputs under 64 GiB).
    pub fn encode(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let iv = Aes256Gcm::generate_nonce(&mut OsRng);

        let mut ciphertext = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(&iv, b"", &mut ciphertext)
            .map_err(|_| CipherError::SealFailure)?;

        let mut envelope = Vec::with_capacity(IV_LEN + ciphertext.len() + TAG_LEN);
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&ciphertext);
        envelope.extend_from_slice(&tag);
        Ok(envelope)
    }

    /// Verify and decrypt an envelope produced by [`EnvelopeCodec::encode`].
    ///
    /// No partial plaintext is ever returned: either the tag verifies and the
    /// full plaintext comes back, or an error does.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::Truncated`] for inputs shorter than
    /// [`MIN_ENVELOPE_LEN`] and [`IntegrityError::TagMismatch`] when the tag
    /// does not authenticate (tampering, corruption, or a different key).
    pub fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, IntegrityError> {
        let parts = EnvelopeParts::split(envelope)?;

        let mut plaintext = parts.ciphertext.to_vec();
        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(parts.iv),
                b"",
                &mut plaintext,
                Tag::from_slice(parts.tag),
            )
            .map_err(|_| IntegrityError::TagMismatch)?;
        Ok(plaintext)
    }
}

impl std::fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnvelopeCodec { .. }")
    }
}
