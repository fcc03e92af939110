//! Header encoding, wire variants, and envelope slicing.

use super::EnvelopeError;
use crate::crypto::{
    block::BlockCipher,
    tag::{generate_padded_tag, generate_tag},
};

/// Encoded header length in bytes.
pub const HEADER_LEN: usize = 3;

/// How the ciphertext and tag are laid out on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// What deployed peers emit: the plaintext is padded twice and the
    /// footer is encrypted with padding on, giving a two-block tag.
    #[default]
    Legacy,
    /// One padding layer and a one-block tag.
    Compact,
}

impl WireFormat {
    /// Parse a configuration value (`"legacy"` or `"compact"`, any case).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    /// Number of padding layers applied to the plaintext before encryption.
    pub fn padding_layers(self) -> usize {
        match self {
            Self::Legacy => 2,
            Self::Compact => 1,
        }
    }

    /// Tag length in bytes for a cipher with `block_size`-byte blocks.
    pub fn tag_len(self, block_size: usize) -> usize {
        match self {
            Self::Legacy => 2 * block_size,
            Self::Compact => block_size,
        }
    }

    /// Compute the tag for `ciphertext`. `None` for empty ciphertext.
    pub fn tag<C: BlockCipher>(self, cipher: &C, ciphertext: &[u8]) -> Option<Vec<u8>> {
        match self {
            Self::Legacy => generate_padded_tag(cipher, ciphertext),
            Self::Compact => generate_tag(cipher, ciphertext),
        }
    }
}

/// The 3-byte envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// `len(ciphertext) + block size + 1`, truncated to 16 bits.
    pub body_len: u16,
    /// Caller-chosen key selector, stored verbatim.
    pub key_selector: u8,
}

impl Header {
    /// Build the header for a ciphertext of `ct_len` bytes under a cipher
    /// with `block_size`-byte blocks.
    ///
    /// The length field counts a single tag block in both wire formats, so a
    /// legacy envelope's field is one block short of its real body. The field
    /// only holds 16 bits; larger bodies wrap, as existing encoders do.
    pub fn for_ciphertext(ct_len: usize, block_size: usize, key_selector: u8) -> Self {
        let body_len = ct_len + block_size + 1;
        Self {
            body_len: (body_len & 0xFFFF) as u16,
            key_selector,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let [hi, lo] = self.body_len.to_be_bytes();
        [hi, lo, self.key_selector]
    }

    /// Parse the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [hi, lo, selector, ..] => Some(Self {
                body_len: u16::from_be_bytes([*hi, *lo]),
                key_selector: *selector,
            }),
            _ => None,
        }
    }
}

/// Keep the lower 8 bits of a numeric key selector.
pub fn selector_byte(key_index: i64) -> u8 {
    (key_index & 0xFF) as u8
}

/// A decoded envelope split into its three sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParts<'a> {
    pub header: Header,
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
}

impl<'a> EnvelopeParts<'a> {
    /// Split raw envelope bytes for a cipher with `block_size`-byte blocks.
    ///
    /// The tag is the final [`WireFormat::tag_len`] bytes; the ciphertext is
    /// everything between the header and the tag and must be a non-empty
    /// whole number of blocks.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] when the sizes do not line up.
    pub fn split(
        raw: &'a [u8],
        block_size: usize,
        wire: WireFormat,
    ) -> Result<Self, EnvelopeError> {
        let tag_len = wire.tag_len(block_size);
        if raw.len() < HEADER_LEN + block_size + tag_len {
            return Err(EnvelopeError::Malformed("envelope too short"));
        }
        let (head, rest) = raw.split_at(HEADER_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - tag_len);
        if ciphertext.len() % block_size != 0 {
            return Err(EnvelopeError::Malformed("ciphertext not block aligned"));
        }
        let header = Header::decode(head).ok_or(EnvelopeError::Malformed("envelope too short"))?;
        Ok(Self {
            header,
            ciphertext,
            tag,
        })
    }

    /// Whether the header's length field agrees with the ciphertext length.
    pub fn header_matches_body(&self, block_size: usize) -> bool {
        let expected =
            Header::for_ciphertext(self.ciphertext.len(), block_size, self.header.key_selector);
        expected.body_len == self.header.body_len
    }
}
