//! ECB-mode block transform over a pluggable block cipher.
//!
//! **ECB is not a secure mode.** Identical plaintext blocks produce identical
//! ciphertext blocks under one key. It is kept only because existing
//! envelopes were produced this way.

use des::cipher::{generic_array::GenericArray, Block, BlockDecrypt, BlockEncrypt, KeyInit};
use des::TdesEde3;
use thiserror::Error;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length for the cipher.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// ECB input is not a whole number of blocks.
    #[error("input of {len} bytes is not a multiple of the {block_size}-byte block size")]
    UnalignedInput { len: usize, block_size: usize },
}

/// A keyed block cipher operating on whole blocks in place.
pub trait BlockCipher: Sized {
    /// Block length in bytes.
    const BLOCK_SIZE: usize;
    /// Raw key length in bytes.
    const KEY_LEN: usize;

    /// Key the cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `key` is not
    /// [`Self::KEY_LEN`] bytes.
    fn new_from_key(key: &[u8]) -> Result<Self, CipherError>;

    /// Encrypt a whole number of blocks in place.
    ///
    /// `blocks.len()` is always a multiple of [`Self::BLOCK_SIZE`].
    fn encrypt_blocks(&self, blocks: &mut [u8]);

    /// Decrypt a whole number of blocks in place.
    fn decrypt_blocks(&self, blocks: &mut [u8]);
}

/// Three-key triple-DES (DES-EDE3), 8-byte blocks, 24-byte keys.
pub struct TripleDes(TdesEde3);

impl BlockCipher for TripleDes {
    const BLOCK_SIZE: usize = 8;
    const KEY_LEN: usize = 24;

    fn new_from_key(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != Self::KEY_LEN {
            return Err(CipherError::InvalidKeyLength {
                expected: Self::KEY_LEN,
                actual: key.len(),
            });
        }
        TdesEde3::new_from_slice(key)
            .map(Self)
            .map_err(|_| CipherError::InvalidKeyLength {
                expected: Self::KEY_LEN,
                actual: key.len(),
            })
    }

    fn encrypt_blocks(&self, blocks: &mut [u8]) {
        let mut arrays = split_blocks(blocks);
        self.0.encrypt_blocks(&mut arrays);
        join_blocks(&arrays, blocks);
    }

    fn decrypt_blocks(&self, blocks: &mut [u8]) {
        let mut arrays = split_blocks(blocks);
        self.0.decrypt_blocks(&mut arrays);
        join_blocks(&arrays, blocks);
    }
}

fn split_blocks(data: &[u8]) -> Vec<Block<TdesEde3>> {
    data.chunks_exact(TripleDes::BLOCK_SIZE)
        .map(GenericArray::clone_from_slice)
        .collect()
}

fn join_blocks(arrays: &[Block<TdesEde3>], out: &mut [u8]) {
    for (dst, src) in out.chunks_exact_mut(TripleDes::BLOCK_SIZE).zip(arrays) {
        dst.copy_from_slice(src);
    }
}

/// Encrypt `data` block by block with no IV and no padding.
///
/// # Errors
///
/// Returns [`CipherError::UnalignedInput`] if `data` is not a whole number of
/// blocks.
pub fn ecb_encrypt<C: BlockCipher>(cipher: &C, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut out = aligned_copy::<C>(data)?;
    cipher.encrypt_blocks(&mut out);
    Ok(out)
}

/// Inverse of [`ecb_encrypt`].
///
/// # Errors
///
/// Returns [`CipherError::UnalignedInput`] if `data` is not a whole number of
/// blocks.
pub fn ecb_decrypt<C: BlockCipher>(cipher: &C, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut out = aligned_copy::<C>(data)?;
    cipher.decrypt_blocks(&mut out);
    Ok(out)
}

fn aligned_copy<C: BlockCipher>(data: &[u8]) -> Result<Vec<u8>, CipherError> {
    if data.len() % C::BLOCK_SIZE != 0 {
        return Err(CipherError::UnalignedInput {
            len: data.len(),
            block_size: C::BLOCK_SIZE,
        });
    }
    Ok(data.to_vec())
}
