//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the Block Operations service requires.
//!
//! Key resolution and block server calls are async and receive the
//! caller's `OpContext`. Crypto and codec work is synchronous CPU work.

use crate::domain::entities::{Block, EncryptedBlock};
use crate::domain::errors::{BlockServerError, CodecError, KeyError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_crypto::CryptoError;
use shared_types::{
    BlockCryptKey, BlockCryptKeyServerHalf, BlockId, BlockPointer, OpContext, RootMetadata,
    TlfCryptKey, TlfId,
};

/// Resolves folder keys.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Key for encrypting new blocks in `md`'s folder.
    async fn resolve_encryption_key(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
    ) -> Result<TlfCryptKey, KeyError>;

    /// Key for decrypting the block `ptr` names, at `ptr.key_gen`.
    async fn resolve_decryption_key(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
    ) -> Result<TlfCryptKey, KeyError>;
}

/// Block-level cryptographic primitives.
pub trait CryptoEngine: Send + Sync {
    /// Fresh random server half for a new block.
    fn make_random_server_half(&self) -> Result<BlockCryptKeyServerHalf, CryptoError>;

    /// Combine a server half with the folder key into the block key.
    fn unmask_block_crypt_key(
        &self,
        server_half: &BlockCryptKeyServerHalf,
        tlf_key: &TlfCryptKey,
    ) -> Result<BlockCryptKey, CryptoError>;

    /// Encrypt a block.
    ///
    /// Returns the serialized plaintext size alongside the envelope.
    fn encrypt_block<B: Block>(
        &self,
        block: &B,
        key: &BlockCryptKey,
    ) -> Result<(usize, EncryptedBlock), CryptoError>;

    /// Decrypt an envelope into a fresh block.
    fn decrypt_block<B: Block>(
        &self,
        encrypted: &EncryptedBlock,
        key: &BlockCryptKey,
    ) -> Result<B, CryptoError>;

    /// Permanent, content-derived ID of encoded envelope bytes.
    fn make_permanent_block_id(&self, encoded: &[u8]) -> Result<BlockId, CryptoError>;
}

/// Encodes the encrypted envelope.
pub trait BlockCodec: Send + Sync {
    /// Serialize `value` to bytes.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Deserialize bytes into a `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// Remote, folder-scoped, reference-counted block store.
#[async_trait]
pub trait BlockServer: Send + Sync {
    /// Fetch stored bytes and the server half for `id`.
    async fn get(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<(Vec<u8>, BlockCryptKeyServerHalf), BlockServerError>;

    /// Store new bytes and server half under `id`, registering `ptr`'s
    /// reference.
    async fn put(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
        buf: &[u8],
        server_half: &BlockCryptKeyServerHalf,
    ) -> Result<(), BlockServerError>;

    /// Register an additional reference to bytes already stored under `id`.
    async fn add_block_reference(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<(), BlockServerError>;

    /// Drop `ptr`'s reference on `id`.
    ///
    /// Returns the number of references still live. The server reclaims the
    /// bytes once this reaches zero.
    async fn remove_block_reference(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<u64, BlockServerError>;
}
