//! The envelope's integrity tag (called "MAC" on the wire).
//!
//! The tag is the encryption of the footer block `last ciphertext byte ∥
//! 0xFF…`. It binds only the final ciphertext byte to the key; it is **not**
//! a MAC in the cryptographic sense.
//!
//! Envelopes from the existing service encrypt the footer with PKCS#7 on, so
//! their tag is two blocks: `E(footer) ∥ E(0x08 × 8)`.

use super::block::BlockCipher;
use super::padding::pad;

/// Fill byte for the footer block after the leading ciphertext byte.
pub const FOOTER_FILL: u8 = 0xFF;

/// Derive the one-block tag for `ciphertext` under `cipher`.
///
/// Returns `None` for empty ciphertext, which has no final byte to bind.
pub fn generate_tag<C: BlockCipher>(cipher: &C, ciphertext: &[u8]) -> Option<Vec<u8>> {
    let mut footer = footer::<C>(ciphertext)?;
    cipher.encrypt_blocks(&mut footer);
    Some(footer)
}

/// Derive the two-block tag used by the legacy wire format: the footer is
/// padded to two blocks before encryption.
///
/// Returns `None` for empty ciphertext.
pub fn generate_padded_tag<C: BlockCipher>(cipher: &C, ciphertext: &[u8]) -> Option<Vec<u8>> {
    let mut blocks = pad(&footer::<C>(ciphertext)?, C::BLOCK_SIZE);
    cipher.encrypt_blocks(&mut blocks);
    Some(blocks)
}

fn footer<C: BlockCipher>(ciphertext: &[u8]) -> Option<Vec<u8>> {
    let &last = ciphertext.last()?;
    let mut footer = vec![FOOTER_FILL; C::BLOCK_SIZE];
    footer[0] = last;
    Some(footer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::block::{ecb_encrypt, TripleDes};

    fn cipher(fill: u8) -> TripleDes {
        TripleDes::new_from_key(&[fill; 24]).unwrap()
    }

    #[test]
    fn tag_is_one_block_and_deterministic() {
        let c = cipher(0x10);
        let ct = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let a = generate_tag(&c, &ct).unwrap();
        let b = generate_tag(&c, &ct).unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn tag_matches_encrypted_footer() {
        let c = cipher(0x22);
        let ct = [0u8, 0, 0, 0, 0, 0, 0, 0xA7];
        let expected = ecb_encrypt(&c, &[0xA7, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(generate_tag(&c, &ct).unwrap(), expected);
    }

    #[test]
    fn tag_depends_only_on_last_byte() {
        let c = cipher(0x33);
        let a = generate_tag(&c, &[9u8, 9, 9, 9, 9, 9, 9, 0x41]).unwrap();
        let b = generate_tag(&c, &[1u8, 2, 3, 4, 5, 6, 7, 0x41]).unwrap();
        let changed = generate_tag(&c, &[9u8, 9, 9, 9, 9, 9, 9, 0x42]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, changed);
    }

    #[test]
    fn tag_depends_on_key() {
        let ct = [7u8; 8];
        assert_ne!(
            generate_tag(&cipher(0x01), &ct).unwrap(),
            generate_tag(&cipher(0x02), &ct).unwrap()
        );
    }

    #[test]
    fn padded_tag_known_answer() {
        // Key 0x2A × 24, last ciphertext byte 0x98.
        let c = cipher(0x2A);
        let ct = hex::decode("7f28d5d806199b98").unwrap();
        let tag = generate_padded_tag(&c, &ct).unwrap();
        assert_eq!(hex::encode(&tag), "8e6508c153e2c2c27f28d5d806199b98");
    }

    #[test]
    fn padded_tag_extends_plain_tag_with_pad_block() {
        let c = cipher(0x44);
        let ct = [3u8; 16];
        let plain = generate_tag(&c, &ct).unwrap();
        let padded = generate_padded_tag(&c, &ct).unwrap();
        assert_eq!(padded.len(), 16);
        assert_eq!(padded[..8], plain[..]);
        assert_eq!(padded[8..], ecb_encrypt(&c, &[8u8; 8]).unwrap()[..]);
    }

    #[test]
    fn empty_ciphertext_has_no_tag() {
        assert!(generate_tag(&cipher(0x01), &[]).is_none());
        assert!(generate_padded_tag(&cipher(0x01), &[]).is_none());
    }
}
