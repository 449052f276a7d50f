//! AES-256-GCM envelope codec, key handling, and transport checksum.
//!
//! This module is intentionally free of AWS, database and HTTP dependencies.
//!
//! # Envelope format
//!
//! ```text
//! IV (12 bytes) ‖ ciphertext (n bytes) ‖ tag (16 bytes)
//! ```
//!
//! The checksum recorded alongside each file is the SHA-256 of the whole
//! envelope, not of the plaintext.

pub mod digest;
pub mod envelope;
pub mod key;

pub use digest::{sha256_hex, verify_checksum};
pub use envelope::{CipherError, EnvelopeCodec, IntegrityError};
pub use key::SecretKey;
