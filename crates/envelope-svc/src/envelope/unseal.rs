//! Unsealing: slice, decrypt, unpad, and check the tag.

use tracing::debug;
use zeroize::Zeroizing;

use super::{
    format::{EnvelopeParts, WireFormat},
    EnvelopeError,
};
use crate::crypto::{
    block::{ecb_decrypt, BlockCipher},
    padding::{unpad, PaddingMode},
};

/// Knobs for how strictly an envelope is checked.
///
/// The default accepts everything existing peers accept. `padding` governs
/// the plaintext's own padding layer; the outer layer of a
/// [`WireFormat::Legacy`] envelope is always checked strictly, as the
/// deployed decoder does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnsealPolicy {
    pub padding: PaddingMode,
    /// Reject envelopes whose header length field disagrees with the body.
    pub verify_header: bool,
}

/// Open `envelope_hex`, laid out as `wire`, with the caller-supplied
/// `key_hex`.
///
/// The tag is compared after decryption and unpadding, so a tampered tag
/// surfaces as [`EnvelopeError::TagMismatch`] even though the block transform
/// itself succeeded. A wrong key gives the same error in the compact layout;
/// in the legacy layout it usually fails the outer padding check first.
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeySize`] before any other work if the key is not
///   valid hex of the cipher's key length.
/// - [`EnvelopeError::Malformed`] for bad hex or impossible sizes, and for a
///   disagreeing header when [`UnsealPolicy::verify_header`] is set.
/// - [`EnvelopeError::Padding`] under [`PaddingMode::Strict`], and for a
///   legacy envelope whose outer padding is invalid (typically a wrong key).
/// - [`EnvelopeError::TagMismatch`] if the recomputed tag differs.
pub fn unseal<C: BlockCipher>(
    envelope_hex: &str,
    key_hex: &str,
    wire: WireFormat,
    policy: &UnsealPolicy,
) -> Result<String, EnvelopeError> {
    let key = Zeroizing::new(hex::decode(key_hex).map_err(|_| EnvelopeError::InvalidKeySize)?);
    if key.len() != C::KEY_LEN {
        return Err(EnvelopeError::InvalidKeySize);
    }

    let raw = hex::decode(envelope_hex)
        .map_err(|_| EnvelopeError::Malformed("envelope is not valid hex"))?;
    let parts = EnvelopeParts::split(&raw, C::BLOCK_SIZE, wire)?;
    if policy.verify_header && !parts.header_matches_body(C::BLOCK_SIZE) {
        return Err(EnvelopeError::Malformed("header length does not match body"));
    }

    let cipher = C::new_from_key(&key)?;
    let padded = Zeroizing::new(ecb_decrypt(&cipher, parts.ciphertext)?);
    let inner = match wire {
        WireFormat::Legacy => unpad(&padded, C::BLOCK_SIZE, PaddingMode::Strict)?,
        WireFormat::Compact => padded.as_slice(),
    };
    let body = unpad(inner, C::BLOCK_SIZE, policy.padding)?;
    let plaintext = String::from_utf8_lossy(body).into_owned();

    let expected = wire
        .tag(&cipher, parts.ciphertext)
        .ok_or(EnvelopeError::Malformed("empty ciphertext"))?;
    if expected.as_slice() != parts.tag {
        return Err(EnvelopeError::TagMismatch);
    }

    debug!(
        key_selector = parts.header.key_selector,
        ciphertext_len = parts.ciphertext.len(),
        "envelope unsealed"
    );
    Ok(plaintext)
}
