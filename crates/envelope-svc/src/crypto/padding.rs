//! PKCS#7-style padding to the cipher block size.

use thiserror::Error;

/// How [`unpad`] treats the trailing pad bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaddingMode {
    /// Read the last byte `r` and drop `r` bytes without checking them.
    /// Never fails; `r == 0` or `r` larger than the input yields an empty
    /// result. Matches what existing peers accept.
    #[default]
    Lenient,
    /// Require `r` in `1..=block_size`, `r <= len`, and all `r` trailing bytes
    /// equal to `r`.
    Strict,
}

/// Padding rejected under [`PaddingMode::Strict`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaddingError {
    #[error("padded input is empty")]
    Empty,

    #[error("pad length {0} out of range")]
    BadLength(u8),

    #[error("pad bytes are inconsistent")]
    BadBytes,
}

/// Append `r = block_size - (len % block_size)` bytes of value `r`.
///
/// Always adds between 1 and `block_size` bytes; an already aligned input
/// gains a full block.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let r = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + r);
    out.extend_from_slice(data);
    // block_size never exceeds 255 for the ciphers in use.
    out.resize(data.len() + r, r as u8);
    out
}

/// Strip the padding added by [`pad`].
///
/// # Errors
///
/// Only [`PaddingMode::Strict`] returns errors.
pub fn unpad(data: &[u8], block_size: usize, mode: PaddingMode) -> Result<&[u8], PaddingError> {
    let Some(&last) = data.last() else {
        return match mode {
            PaddingMode::Lenient => Ok(data),
            PaddingMode::Strict => Err(PaddingError::Empty),
        };
    };
    let r = usize::from(last);

    match mode {
        PaddingMode::Lenient => {
            let keep = if r == 0 { 0 } else { data.len().saturating_sub(r) };
            Ok(&data[..keep])
        }
        PaddingMode::Strict => {
            if r == 0 || r > block_size || r > data.len() {
                return Err(PaddingError::BadLength(last));
            }
            let (body, tail) = data.split_at(data.len() - r);
            if tail.iter().any(|&b| b != last) {
                return Err(PaddingError::BadBytes);
            }
            Ok(body)
        }
    }
}
