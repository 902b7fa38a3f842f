//! # Domain Invariants
//!
//! Checks the service enforces between collaborator calls.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | Encryption never shrinks data | `encoded_len >= plain_size` |
//! | Bounded block size | `encoded_len <= max_encoded_block_size` |
//! | Content addressing | `id(fetched bytes) == pointer id` |

use super::errors::BlockOpsError;
use shared_types::BlockId;

/// Encoded ciphertext must be at least as large as the plaintext.
///
/// A shorter envelope means the cipher dropped its tag or padding.
pub fn invariant_ciphertext_not_smaller(
    encoded_len: usize,
    plain_size: usize,
) -> Result<(), BlockOpsError> {
    if encoded_len < plain_size {
        return Err(BlockOpsError::TooLowByteCount {
            expected: plain_size,
            actual: encoded_len,
        });
    }
    Ok(())
}

/// Encoded block must fit the configured maximum.
pub fn invariant_block_size_bounded(
    encoded_len: usize,
    max_encoded_block_size: usize,
) -> Result<(), BlockOpsError> {
    if encoded_len > max_encoded_block_size {
        return Err(BlockOpsError::BlockTooLarge {
            size: encoded_len,
            max_size: max_encoded_block_size,
        });
    }
    Ok(())
}

/// Fetched bytes must hash to the ID they were requested under.
pub fn invariant_block_id_matches(expected: BlockId, actual: BlockId) -> Result<(), BlockOpsError> {
    if expected != actual {
        return Err(BlockOpsError::BlockIdMismatch { expected, actual });
    }
    Ok(())
}
