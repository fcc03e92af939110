//! Block-cipher primitives behind the envelope format.
//!
//! This module is intentionally free of HTTP dependencies. It provides the
//! ECB block transform, the padding codec, the tag derivation and key
//! handling used by [`crate::envelope`].
//!
//! # Primitive seam
//!
//! The envelope code is written against the [`block::BlockCipher`] trait; the only
//! implementation shipped is [`TripleDes`] (3-key EDE, 8-byte blocks), which
//! the legacy wire format requires.

pub mod block;
pub mod key;
pub mod padding;
pub mod tag;

pub use block::{CipherError, TripleDes};
pub use key::{EnvelopeKey, KeySource, OsKeySource};
pub use padding::PaddingMode;
