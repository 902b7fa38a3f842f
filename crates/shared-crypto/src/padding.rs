//! # Block Padding
//!
//! Hides the exact plaintext length from the block server by padding every
//! block up to a power of two before encryption.
//!
//! Layout: `len (u32 LE) || data || zero padding`.

use crate::CryptoError;

/// Size of the length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Total padded size for `data_len` bytes of payload.
pub fn padded_len(data_len: usize, min_padded_size: usize) -> usize {
    (data_len + LENGTH_PREFIX_LEN)
        .max(min_padded_size)
        .next_power_of_two()
}

/// Pad `data` to the next power of two, at least `min_padded_size`.
///
/// # Errors
///
/// Returns `CryptoError::InvalidInput` if `data` does not fit the u32 prefix.
pub fn pad_block(data: &[u8], min_padded_size: usize) -> Result<Vec<u8>, CryptoError> {
    let len = u32::try_from(data.len())
        .map_err(|_| CryptoError::InvalidInput(format!("block of {} bytes", data.len())))?;

    let total = padded_len(data.len(), min_padded_size);
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(data);
    out.resize(total, 0);
    Ok(out)
}

/// Strip padding added by [`pad_block`].
///
/// # Errors
///
/// Returns `CryptoError::InvalidPadding` if the prefix is missing or claims
/// more bytes than present.
pub fn depad_block(padded: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let prefix: [u8; LENGTH_PREFIX_LEN] = padded
        .get(..LENGTH_PREFIX_LEN)
        .and_then(|p| p.try_into().ok())
        .ok_or_else(|| CryptoError::InvalidPadding("missing length prefix".to_string()))?;

    let len = u32::from_le_bytes(prefix) as usize;
    let end = LENGTH_PREFIX_LEN
        .checked_add(len)
        .filter(|end| *end <= padded.len())
        .ok_or_else(|| {
            CryptoError::InvalidPadding(format!(
                "prefix claims {} bytes, only {} present",
                len,
                padded.len() - LENGTH_PREFIX_LEN
            ))
        })?;

    Ok(padded[LENGTH_PREFIX_LEN..end].to_vec())
}
