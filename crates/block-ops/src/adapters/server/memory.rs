//! # In-Memory Block Server
//!
//! Folder-scoped, reference-counted content store.
//!
//! Each block ID maps to one entry holding the encoded bytes, the server
//! half and the set of live reference nonces. The entry is reclaimed when
//! its last reference is removed.

use crate::domain::errors::BlockServerError;
use crate::ports::outbound::BlockServer;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::sha256;
use shared_types::{
    BlockCryptKeyServerHalf, BlockId, BlockPointer, BlockRefNonce, ContextState, HashType,
    OpContext, TlfId,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

struct StoredEntry {
    tlf: TlfId,
    buf: Vec<u8>,
    server_half: BlockCryptKeyServerHalf,
    refs: HashSet<BlockRefNonce>,
}

/// In-memory block server for tests and single-process use.
///
/// Clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryBlockServer {
    blocks: Arc<Mutex<HashMap<BlockId, StoredEntry>>>,
}

impl InMemoryBlockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live references on `id` (0 if absent).
    pub fn ref_count(&self, id: &BlockId) -> usize {
        self.blocks.lock().get(id).map_or(0, |e| e.refs.len())
    }

    /// Whether bytes are stored under `id`.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.lock().contains_key(id)
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }
}

fn check_context(ctx: &OpContext) -> Result<(), BlockServerError> {
    match ctx.state() {
        ContextState::Live => Ok(()),
        ContextState::Cancelled => Err(BlockServerError::Cancelled),
        ContextState::DeadlineExceeded => Err(BlockServerError::DeadlineExceeded),
    }
}

fn check_folder(entry: &StoredEntry, id: BlockId, tlf: TlfId) -> Result<(), BlockServerError> {
    if entry.tlf != tlf {
        return Err(BlockServerError::WrongFolder {
            id,
            owner: entry.tlf,
            requested: tlf,
        });
    }
    Ok(())
}

#[async_trait]
impl BlockServer for InMemoryBlockServer {
    async fn get(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        _ptr: &BlockPointer,
    ) -> Result<(Vec<u8>, BlockCryptKeyServerHalf), BlockServerError> {
        check_context(ctx)?;
        let blocks = self.blocks.lock();
        let entry = blocks
            .get(&id)
            .ok_or(BlockServerError::NonExistent { id })?;
        check_folder(entry, id, tlf)?;
        Ok((entry.buf.clone(), entry.server_half.clone()))
    }

    async fn put(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
        buf: &[u8],
        server_half: &BlockCryptKeyServerHalf,
    ) -> Result<(), BlockServerError> {
        check_context(ctx)?;
        if id.hash_type() != HashType::Sha256 || id.digest() != &sha256(buf) {
            return Err(BlockServerError::IdMismatch { id });
        }

        let mut blocks = self.blocks.lock();
        match blocks.get_mut(&id) {
            Some(entry) => {
                check_folder(entry, id, tlf)?;
                if entry.buf != buf {
                    return Err(BlockServerError::IdCollision { id });
                }
                // Resending identical bytes only re-registers the reference.
                entry.refs.insert(ptr.ref_nonce);
            }
            None => {
                blocks.insert(
                    id,
                    StoredEntry {
                        tlf,
                        buf: buf.to_vec(),
                        server_half: server_half.clone(),
                        refs: HashSet::from([ptr.ref_nonce]),
                    },
                );
            }
        }
        Ok(())
    }

    async fn add_block_reference(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<(), BlockServerError> {
        check_context(ctx)?;
        let mut blocks = self.blocks.lock();
        let entry = blocks
            .get_mut(&id)
            .ok_or(BlockServerError::NonExistent { id })?;
        check_folder(entry, id, tlf)?;
        entry.refs.insert(ptr.ref_nonce);
        Ok(())
    }

    async fn remove_block_reference(
        &self,
        ctx: &OpContext,
        tlf: TlfId,
        id: BlockId,
        ptr: &BlockPointer,
    ) -> Result<u64, BlockServerError> {
        check_context(ctx)?;
        let mut blocks = self.blocks.lock();
        let Some(entry) = blocks.get_mut(&id) else {
            return Ok(0);
        };
        check_folder(entry, id, tlf)?;
        entry.refs.remove(&ptr.ref_nonce);

        let live = entry.refs.len() as u64;
        if live == 0 {
            blocks.remove(&id);
        }
        Ok(live)
    }
}
