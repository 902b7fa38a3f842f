//! # In-Memory Key Manager
//!
//! Per-folder key history for tests and single-process use. Generation `n`
//! is the `n`-th key added; public folders resolve the well-known key.

use crate::domain::errors::KeyError;
use crate::ports::outbound::KeyResolver;
use async_trait::async_trait;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use shared_types::{
    BlockPointer, ContextState, KeyGen, OpContext, RootMetadata, TlfCryptKey, TlfId,
    FIRST_VALID_KEY_GEN, KEY_BYTE_LEN, PUBLIC_KEY_GEN, PUBLIC_TLF_CRYPT_KEY,
};
use std::collections::HashMap;
use std::sync::Arc;
use zeroize::Zeroize;

/// In-memory folder key history.
///
/// Generation `n` of a folder is the `n`-th key added for it. Public
/// folders always resolve the well-known public key. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyManager {
    keys: Arc<RwLock<HashMap<TlfId, Vec<TlfCryptKey>>>>,
}

impl InMemoryKeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key generation for `tlf` and return its number.
    pub fn add_key(&self, tlf: TlfId, key: TlfCryptKey) -> KeyGen {
        let mut keys = self.keys.write();
        let history = keys.entry(tlf).or_default();
        history.push(key);
        KeyGen(history.len() as i32)
    }

    /// Rotate `tlf` to a fresh random key.
    pub fn add_random_key(&self, tlf: TlfId) -> KeyGen {
        let mut bytes = [0u8; KEY_BYTE_LEN];
        OsRng.fill_bytes(&mut bytes);
        let generation = self.add_key(tlf, TlfCryptKey::from_bytes(bytes));
        bytes.zeroize();
        generation
    }

    /// Latest known generation for `tlf`, if any.
    pub fn latest_key_gen(&self, tlf: TlfId) -> Option<KeyGen> {
        self.keys
            .read()
            .get(&tlf)
            .filter(|history| !history.is_empty())
            .map(|history| KeyGen(history.len() as i32))
    }

    fn key_at(&self, md: &RootMetadata, key_gen: KeyGen) -> Result<TlfCryptKey, KeyError> {
        let latest = md.latest_key_generation();
        let keys = self.keys.read();
        let history = keys
            .get(&md.id)
            .filter(|history| !history.is_empty())
            .ok_or(KeyError::NoKeys { tlf: md.id })?;

        let invalid = KeyError::InvalidKeyGeneration {
            tlf: md.id,
            key_gen,
            latest,
        };
        if key_gen < FIRST_VALID_KEY_GEN || key_gen > latest {
            return Err(invalid);
        }
        history
            .get((key_gen.0 - 1) as usize)
            .cloned()
            .ok_or(invalid)
    }
}

fn check_context(ctx: &OpContext) -> Result<(), KeyError> {
    match ctx.state() {
        ContextState::Live => Ok(()),
        ContextState::Cancelled => Err(KeyError::Cancelled),
        ContextState::DeadlineExceeded => Err(KeyError::DeadlineExceeded),
    }
}

#[async_trait]
impl KeyResolver for InMemoryKeyManager {
    async fn resolve_encryption_key(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
    ) -> Result<TlfCryptKey, KeyError> {
        check_context(ctx)?;
        if md.id.is_public() {
            return Ok(PUBLIC_TLF_CRYPT_KEY);
        }
        self.key_at(md, md.latest_key_generation())
    }

    async fn resolve_decryption_key(
        &self,
        ctx: &OpContext,
        md: &RootMetadata,
        ptr: &BlockPointer,
    ) -> Result<TlfCryptKey, KeyError> {
        check_context(ctx)?;
        if md.id.is_public() {
            if ptr.key_gen != PUBLIC_KEY_GEN {
                return Err(KeyError::InvalidKeyGeneration {
                    tlf: md.id,
                    key_gen: ptr.key_gen,
                    latest: PUBLIC_KEY_GEN,
                });
            }
            return Ok(PUBLIC_TLF_CRYPT_KEY);
        }
        self.key_at(md, ptr.key_gen)
    }
}
