//! # Block Operations Service
//!
//! The main service implementing the Block Operations API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `BlockOps` (`get`, `ready`, `put`, `delete`)
//! 2. Enforces the size and addressing invariants between collaborator calls
//! 3. Uses dependency injection for all four collaborators
//! 4. Holds no mutable state, so it is shared freely across tasks

mod ops;

use crate::domain::value_objects::BlockOpsConfig;
use crate::ports::outbound::{BlockCodec, BlockServer, CryptoEngine, KeyResolver};

/// The Block Operations Service.
pub struct BlockOpsService<K, C, D, S>
where
    K: KeyResolver,
    C: CryptoEngine,
    D: BlockCodec,
    S: BlockServer,
{
    /// Folder key lookup.
    pub(crate) keys: K,
    /// Block crypto primitives.
    pub(crate) crypto: C,
    /// Envelope codec.
    pub(crate) codec: D,
    /// Remote block store.
    pub(crate) server: S,
    /// Service configuration.
    pub(crate) config: BlockOpsConfig,
}

/// Dependencies for BlockOpsService
pub struct BlockOpsDependencies<K, C, D, S> {
    pub keys: K,
    pub crypto: C,
    pub codec: D,
    pub server: S,
}

impl<K, C, D, S> BlockOpsService<K, C, D, S>
where
    K: KeyResolver,
    C: CryptoEngine,
    D: BlockCodec,
    S: BlockServer,
{
    /// Create a new Block Operations Service with the given dependencies.
    ///
    /// `config` is taken as given. Builder-made configs should pass
    /// [`BlockOpsConfig::validate`] first; `from_env` already does.
    pub fn new(deps: BlockOpsDependencies<K, C, D, S>, config: BlockOpsConfig) -> Self {
        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            cipher = %config.cipher,
            min_padded_size = config.min_padded_size,
            max_encoded_block_size = config.max_encoded_block_size,
            verify_block_ids = config.verify_block_ids,
            "[block-ops] service created"
        );

        Self {
            keys: deps.keys,
            crypto: deps.crypto,
            codec: deps.codec,
            server: deps.server,
            config,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &BlockOpsConfig {
        &self.config
    }

    /// Key resolver in use.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// Crypto engine in use.
    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    /// Block server in use.
    pub fn server(&self) -> &S {
        &self.server
    }
}

#[cfg(feature = "adapters")]
mod in_memory {
    use super::*;
    use crate::adapters::{
        BincodeCodec, CryptoConfig, InMemoryBlockServer, InMemoryKeyManager, StandardCrypto,
    };
    use crate::domain::errors::ConfigError;

    /// Service wired to the reference adapters.
    pub type InMemoryBlockOps =
        BlockOpsService<InMemoryKeyManager, StandardCrypto<BincodeCodec>, BincodeCodec, InMemoryBlockServer>;

    impl InMemoryBlockOps {
        /// Create a service over an empty in-memory key manager and block
        /// server.
        ///
        /// # Errors
        ///
        /// Returns `ConfigError` if `config` fails validation.
        pub fn new_in_memory(config: BlockOpsConfig) -> Result<Self, ConfigError> {
            config.validate()?;
            let deps = BlockOpsDependencies {
                keys: InMemoryKeyManager::new(),
                crypto: StandardCrypto::new(BincodeCodec, CryptoConfig::from(&config)),
                codec: BincodeCodec,
                server: InMemoryBlockServer::new(),
            };
            Ok(Self::new(deps, config))
        }
    }
}

#[cfg(feature = "adapters")]
pub use in_memory::InMemoryBlockOps;
