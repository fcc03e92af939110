//! The sealed envelope: `hex(header ∥ ciphertext ∥ tag)`.
//!
//! # Layout
//!
//! ```text
//! +----------+----------+-----------+----------------------+---------------+
//! | len_hi   | len_lo   | selector  | ciphertext (n × 8)   | tag (16 or 8) |
//! +----------+----------+-----------+----------------------+---------------+
//!   big-endian len = n×8 + 9
//! ```
//!
//! The ciphertext is 3DES-ECB over PKCS#7-padded UTF-8 plaintext, keyed by a
//! fresh random key per seal. In the [`WireFormat::Legacy`] layout written by
//! deployed peers the plaintext is padded twice and the tag is two blocks;
//! the length field still counts one tag block. [`WireFormat::Compact`] pads
//! once and writes a one-block tag. See [`crate::crypto::tag`] for the tag.

pub mod format;
pub mod seal;
pub mod unseal;

pub use format::{WireFormat, HEADER_LEN};
pub use seal::seal;
pub use unseal::{unseal, UnsealPolicy};

use thiserror::Error;

use crate::crypto::{padding::PaddingError, CipherError};

/// Errors produced while sealing or unsealing an envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The supplied key is not valid hex of the cipher's key length.
    #[error("invalid key size")]
    InvalidKeySize,

    /// The envelope does not have the expected structure.
    #[error("malformed envelope: {0}")]
    Malformed(&'static str),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Padding rejected in strict mode.
    #[error("invalid padding: {0}")]
    Padding(#[from] PaddingError),

    /// The recomputed tag differs from the received one.
    #[error("tag mismatch")]
    TagMismatch,
}
