//! Sealing: pad, encrypt, tag, and frame a plaintext.

use tracing::debug;
use zeroize::Zeroizing;

use super::{
    format::{Header, WireFormat},
    EnvelopeError,
};
use crate::crypto::{
    block::{ecb_encrypt, BlockCipher},
    padding::pad,
    EnvelopeKey, KeySource,
};

/// A sealed envelope and the key that opens it.
#[derive(Debug)]
pub struct Sealed {
    /// Lower-case hex of header ∥ ciphertext ∥ tag.
    pub envelope: String,
    /// The freshly generated key. The caller is responsible for keeping it.
    pub key: EnvelopeKey,
}

/// Seal `plaintext` under a fresh key from `keys`.
///
/// `key_selector` is stored verbatim in the third header byte. `wire`
/// selects how many padding layers and which tag width are written.
///
/// # Errors
///
/// Returns [`EnvelopeError::Cipher`] if the cipher rejects the generated key.
pub fn seal<C: BlockCipher>(
    plaintext: &str,
    key_selector: u8,
    keys: &dyn KeySource,
    wire: WireFormat,
) -> Result<Sealed, EnvelopeError> {
    let key = keys.generate();
    let cipher = C::new_from_key(key.as_bytes())?;

    let mut padded = Zeroizing::new(plaintext.as_bytes().to_vec());
    for _ in 0..wire.padding_layers() {
        padded = Zeroizing::new(pad(&padded, C::BLOCK_SIZE));
    }
    let ciphertext = ecb_encrypt(&cipher, &padded)?;
    // Padding guarantees at least one block.
    let tag = wire
        .tag(&cipher, &ciphertext)
        .ok_or(EnvelopeError::Malformed("empty ciphertext"))?;

    let header = Header::for_ciphertext(ciphertext.len(), C::BLOCK_SIZE, key_selector);

    let mut envelope = String::with_capacity(2 * (super::HEADER_LEN + ciphertext.len() + tag.len()));
    envelope.push_str(&hex::encode(header.encode()));
    envelope.push_str(&hex::encode(&ciphertext));
    envelope.push_str(&hex::encode(&tag));

    debug!(
        key_selector,
        ?wire,
        ciphertext_len = ciphertext.len(),
        "envelope sealed"
    );
    Ok(Sealed { envelope, key })
}
