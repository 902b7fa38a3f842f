//! # Domain Errors
//!
//! Error types for the Block Operations layer and the ports it drives.
//!
//! ## Design Principles
//!
//! - Collaborator failures are carried verbatim: each wrapping variant is
//!   `#[error(transparent)]`, so `Display` and `source()` are the
//!   collaborator's own.
//! - The size-invariant violation has its own variant so callers can tell
//!   "data corruption risk" apart from infrastructure faults.
//! - No panics in domain logic (use Result instead)

use shared_crypto::CryptoError;
use shared_types::{BlockId, KeyGen, TlfId};
use thiserror::Error;

/// Errors from the key resolver port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The folder has no keys at all.
    #[error("No keys for folder {tlf}")]
    NoKeys { tlf: TlfId },

    /// Requested generation is outside the folder's key history.
    #[error("Invalid key generation {key_gen} for folder {tlf} (latest {latest})")]
    InvalidKeyGeneration {
        tlf: TlfId,
        key_gen: KeyGen,
        latest: KeyGen,
    },

    /// Lookup ran under a cancelled context.
    #[error("Key lookup cancelled")]
    Cancelled,

    /// Lookup ran past the context deadline.
    #[error("Key lookup deadline exceeded")]
    DeadlineExceeded,

    /// Key service could not be reached.
    #[error("Key service unavailable: {0}")]
    Unavailable(String),
}

/// Serialization/deserialization error from the codec port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Codec error: {message}")]
pub struct CodecError {
    pub message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from the block server port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockServerError {
    /// No block stored under this ID.
    #[error("Block does not exist: {id}")]
    NonExistent { id: BlockId },

    /// Different bytes already stored under this ID.
    #[error("Block ID collision: {id}")]
    IdCollision { id: BlockId },

    /// Uploaded bytes do not hash to the claimed ID.
    #[error("Block ID {id} does not match uploaded bytes")]
    IdMismatch { id: BlockId },

    /// Block belongs to another folder.
    #[error("Block {id} belongs to folder {owner}, not {requested}")]
    WrongFolder {
        id: BlockId,
        owner: TlfId,
        requested: TlfId,
    },

    /// Request ran under a cancelled context.
    #[error("Block server request cancelled")]
    Cancelled,

    /// Request ran past the context deadline.
    #[error("Block server deadline exceeded")]
    DeadlineExceeded,

    /// Server could not be reached or refused service.
    #[error("Block server unavailable: {0}")]
    Unavailable(String),
}

impl BlockServerError {
    /// Whether repeating the same request may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            BlockServerError::Unavailable(_) | BlockServerError::DeadlineExceeded
        )
    }
}

/// Errors returned by the Block Operations API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockOpsError {
    /// Key resolver failure, unchanged.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Crypto engine failure, unchanged.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Codec failure, unchanged.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Block server failure, unchanged.
    #[error(transparent)]
    Server(#[from] BlockServerError),

    /// Encoded ciphertext is smaller than the plaintext it encrypts.
    ///
    /// Signals a broken cipher (missing tag or padding). Never retriable.
    #[error("Ciphertext too small: {actual} encoded bytes for {expected} plaintext bytes")]
    TooLowByteCount { expected: usize, actual: usize },

    /// Encoded block exceeds the configured maximum.
    #[error("Block too large: {size} bytes, max {max_size} bytes")]
    BlockTooLarge { size: usize, max_size: usize },

    /// Fetched bytes do not hash to the pointer's ID.
    #[error("Block ID mismatch: expected {expected}, got {actual}")]
    BlockIdMismatch { expected: BlockId, actual: BlockId },
}

impl BlockOpsError {
    /// Whether the caller may retry the same operation.
    pub fn is_retriable(&self) -> bool {
        match self {
            BlockOpsError::Server(e) => e.is_retriable(),
            BlockOpsError::Key(e) => matches!(
                e,
                KeyError::Unavailable(_) | KeyError::DeadlineExceeded
            ),
            BlockOpsError::Crypto(_)
            | BlockOpsError::Codec(_)
            | BlockOpsError::TooLowByteCount { .. }
            | BlockOpsError::BlockTooLarge { .. }
            | BlockOpsError::BlockIdMismatch { .. } => false,
        }
    }
}

/// Invalid `BlockOpsConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Padding floor must be a non-zero power of two.
    #[error("min_padded_size must be a non-zero power of two, got {0}")]
    InvalidPaddedSize(usize),

    /// Maximum block size below the padding floor.
    #[error("max_encoded_block_size {max} is smaller than min_padded_size {min}")]
    MaxBelowMin { max: usize, min: usize },

    /// Environment variable could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}
