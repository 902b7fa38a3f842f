//! # Two-Party Key Split
//!
//! A block key is split into a random server half and the folder key.
//! Combining is a plain XOR. Neither half alone reveals anything about the
//! block key.

use crate::symmetric::KEY_LEN;

/// XOR two keys byte by byte.
pub fn xor_keys(a: &[u8; KEY_LEN], b: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = x ^ y;
    }
    out
}

/// Recover the block key from the server half and the folder key.
pub fn unmask_key(server_half: &[u8; KEY_LEN], folder_key: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    xor_keys(server_half, folder_key)
}
