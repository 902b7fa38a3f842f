//! # Inbound Ports (Driving Ports)
//!
//! The API the filesystem layer uses to move blocks to and from the block
//! server.

use crate::domain::entities::{Block, ReadyBlockData};
use crate::domain::errors::BlockOpsError;
use async_trait::async_trait;
use shared_types::{BlockId, BlockPointer, OpContext, RootMetadata};

/// Block Operations API.
///
/// Every operation is stateless and reentrant. `ctx` is forwarded unchanged
/// to every key resolver and block server call, even when already cancelled.
#[async_trait]
pub trait BlockOps: Send + Sync {
    /// Fetch the block `ptr` names and decrypt it.
    ///
    /// Decryption uses the key generation recorded on `ptr`. The block is
    /// returned only when every step succeeds.
    async fn get<B: Block>(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
    ) -> Result<B, BlockOpsError>;

    /// Encrypt `block` under the folder's latest key and compute its
    /// permanent ID.
    ///
    /// Returns `(id, plain_size, ready_data)`. Fails with
    /// `TooLowByteCount` if the encoded ciphertext is smaller than the
    /// plaintext.
    async fn ready<B: Block>(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        block: &B,
    ) -> Result<(BlockId, usize, ReadyBlockData), BlockOpsError>;

    /// Store a readied block.
    ///
    /// A zero reference nonce uploads the bytes; any other nonce only adds a
    /// reference to bytes already stored under `ptr.id`.
    async fn put(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
        ready_data: &ReadyBlockData,
    ) -> Result<(), BlockOpsError>;

    /// Release the reference `ptr` holds on block `id`.
    async fn delete(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<(), BlockOpsError>;
}
