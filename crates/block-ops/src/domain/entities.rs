//! # Block Entities
//!
//! The plaintext block capability, the encrypted envelope that is encoded
//! and hashed, and the output of `ready`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_crypto::Cipher;
use shared_types::BlockCryptKeyServerHalf;

/// A plaintext payload the block layer can carry.
///
/// The layer never interprets block contents; it only needs to serialize
/// them into the crypto engine and back out.
pub trait Block: Serialize + DeserializeOwned + Send + Sync {}

impl<T> Block for T where T: Serialize + DeserializeOwned + Send + Sync {}

/// Version of the encrypted envelope format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncryptionVer(pub u32);

/// First (and current) envelope version.
pub const ENCRYPTION_VER_1: EncryptionVer = EncryptionVer(1);

impl Default for EncryptionVer {
    fn default() -> Self {
        ENCRYPTION_VER_1
    }
}

/// Encrypted block envelope.
///
/// The encoded form of this struct is what the block server stores and what
/// the permanent block ID is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlock {
    /// Envelope format version.
    pub version: EncryptionVer,
    /// Cipher that produced `encrypted_data`.
    pub cipher: Cipher,
    /// Per-encryption nonce.
    pub nonce: Vec<u8>,
    /// Padded, authenticated ciphertext.
    pub encrypted_data: Vec<u8>,
}

/// Output of `ready`, consumed by exactly one `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyBlockData {
    /// Encoded `EncryptedBlock` bytes.
    pub buf: Vec<u8>,
    /// Random half of the block key, stored server-side next to `buf`.
    pub server_half: BlockCryptKeyServerHalf,
}

impl ReadyBlockData {
    /// Number of bytes the block server will store.
    pub fn encoded_size(&self) -> usize {
        self.buf.len()
    }
}
