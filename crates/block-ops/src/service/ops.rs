//! # Block Operations API Implementation
//!
//! Implements the BlockOps trait: the write path (`ready`, `put`), the read
//! path (`get`) and reference release (`delete`).

use super::*;
use crate::domain::entities::{Block, EncryptedBlock, ReadyBlockData};
use crate::domain::errors::BlockOpsError;
use crate::domain::invariants::{
    invariant_block_id_matches, invariant_block_size_bounded, invariant_ciphertext_not_smaller,
};
use crate::ports::inbound::BlockOps;
use async_trait::async_trait;
use shared_types::{BlockId, BlockPointer, OpContext, RootMetadata};

#[async_trait]
impl<K, C, D, S> BlockOps for BlockOpsService<K, C, D, S>
where
    K: KeyResolver,
    C: CryptoEngine,
    D: BlockCodec,
    S: BlockServer,
{
    async fn get<B: Block>(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
    ) -> Result<B, BlockOpsError> {
        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            block_id = %ptr.id,
            tlf_id = %md.id,
            key_gen = %ptr.key_gen,
            "[block-ops] get"
        );

        let (buf, server_half) = self.server.get(ctx, md.id, ptr.id, ptr).await?;

        if self.config.verify_block_ids {
            let actual = self.crypto.make_permanent_block_id(&buf)?;
            if let Err(e) = invariant_block_id_matches(ptr.id, actual) {
                #[cfg(feature = "tracing-log")]
                tracing::warn!(block_id = %ptr.id, actual = %actual, "[block-ops] fetched block failed ID check");
                return Err(e);
            }
        }

        // The pointer's generation, not the folder's latest.
        let tlf_key = self.keys.resolve_decryption_key(ctx, md, ptr).await?;
        let block_key = self.crypto.unmask_block_crypt_key(&server_half, &tlf_key)?;

        let encrypted: EncryptedBlock = self.codec.decode(&buf)?;
        let block = self.crypto.decrypt_block(&encrypted, &block_key)?;

        Ok(block)
    }

    async fn ready<B: Block>(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        block: &B,
    ) -> Result<(BlockId, usize, ReadyBlockData), BlockOpsError> {
        let tlf_key = self.keys.resolve_encryption_key(ctx, md).await?;

        let server_half = self.crypto.make_random_server_half()?;
        let block_key = self.crypto.unmask_block_crypt_key(&server_half, &tlf_key)?;

        let (plain_size, encrypted) = self.crypto.encrypt_block(block, &block_key)?;
        let buf = self.codec.encode(&encrypted)?;

        if let Err(e) = invariant_ciphertext_not_smaller(buf.len(), plain_size) {
            #[cfg(feature = "tracing-log")]
            tracing::warn!(
                tlf_id = %md.id,
                plain_size,
                encoded_size = buf.len(),
                "[block-ops] encrypted block smaller than plaintext"
            );
            return Err(e);
        }
        invariant_block_size_bounded(buf.len(), self.config.max_encoded_block_size)?;

        let id = self.crypto.make_permanent_block_id(&buf)?;

        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            block_id = %id,
            tlf_id = %md.id,
            plain_size,
            encoded_size = buf.len(),
            "[block-ops] block ready"
        );

        Ok((id, plain_size, ReadyBlockData { buf, server_half }))
    }

    async fn put(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
        ready_data: &ReadyBlockData,
    ) -> Result<(), BlockOpsError> {
        if ptr.ref_nonce.is_zero() {
            #[cfg(feature = "tracing-log")]
            tracing::debug!(
                block_id = %ptr.id,
                tlf_id = %md.id,
                size = ready_data.encoded_size(),
                "[block-ops] put new block"
            );

            self.server
                .put(
                    ctx,
                    md.id,
                    ptr.id,
                    ptr,
                    &ready_data.buf,
                    &ready_data.server_half,
                )
                .await?;
        } else {
            #[cfg(feature = "tracing-log")]
            tracing::debug!(
                block_id = %ptr.id,
                tlf_id = %md.id,
                ref_nonce = %ptr.ref_nonce,
                "[block-ops] add block reference"
            );

            self.server
                .add_block_reference(ctx, md.id, ptr.id, ptr)
                .await?;
        }
        Ok(())
    }

    async fn delete(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<(), BlockOpsError> {
        let live_refs = self
            .server
            .remove_block_reference(ctx, md.id, id, ptr)
            .await?;

        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            block_id = %id,
            tlf_id = %md.id,
            ref_nonce = %ptr.ref_nonce,
            live_refs,
            "[block-ops] removed block reference"
        );
        #[cfg(not(feature = "tracing-log"))]
        let _ = live_refs;

        Ok(())
    }
}
