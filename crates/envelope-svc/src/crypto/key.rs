//! Per-request envelope keys and the random source that produces them.

use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of a 3-key triple-DES key (24 bytes = 192 bits).
pub const KEY_LEN: usize = 24;

/// Raw key bytes, wiped from memory on drop.
///
/// Lifetime is a single seal request; the key is handed back to the caller
/// and never stored.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EnvelopeKey([u8; KEY_LEN]);

impl EnvelopeKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnvelopeKey(..)")
    }
}

/// Source of fresh seal keys. Shared process-wide, so it must be safe for
/// concurrent use.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource: Send + Sync {
    fn generate(&self) -> EnvelopeKey;
}

/// Keys drawn from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsKeySource;

impl KeySource for OsKeySource {
    fn generate(&self) -> EnvelopeKey {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        let key = EnvelopeKey::from_bytes(bytes);
        bytes.zeroize();
        key
    }
}
