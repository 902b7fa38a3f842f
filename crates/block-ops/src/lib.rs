//! # Block Operations
//!
//! Client-side layer that turns plaintext filesystem blocks into encrypted,
//! content-addressed, deduplicable objects for an untrusted block server,
//! and reverses that transform on read.
//!
//! ## Data Flow
//!
//! ```text
//! write:  block ──ready──→ (id, plain_size, ReadyBlockData) ──put──→ Block Server
//!                 │                                          │
//!                 ├─ folder key (Key Resolver)               ├─ zero nonce:  put bytes + server half
//!                 ├─ random server half, unmask, encrypt     └─ other nonce: add reference only
//!                 ├─ encode envelope (Codec)
//!                 └─ size check, permanent ID
//!
//! read:   BlockPointer ──get──→ Block Server bytes ──→ key at ptr.key_gen ──→ decode ──→ decrypt ──→ block
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | Content addressing | `get` re-hashes fetched bytes (configurable) |
//! | 2 | Encryption never shrinks data | `ready` fails with `TooLowByteCount` |
//! | 3 | Block key stays client-side | `BlockCryptKey` has no `Serialize` |
//! | 4 | Historical reads | decryption key resolved at the pointer's generation |
//! | 5 | Bounded blocks | `ready` fails with `BlockTooLarge` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, invariants, configuration, errors
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `service/` - Application service implementing the API
//! - `adapters/` - Reference implementations of every outbound port
//!
//! ## Usage
//!
//! ```ignore
//! use block_ops::{BlockOps, BlockOpsConfig, InMemoryBlockOps};
//! use shared_types::{BlockPointer, OpContext, RootMetadata, TlfId, UserId};
//!
//! let ops = InMemoryBlockOps::new_in_memory(BlockOpsConfig::default())?;
//! let tlf = TlfId::fake(1, false);
//! let key_gen = ops.keys().add_random_key(tlf);
//! let md = RootMetadata::new(tlf, key_gen);
//! let ctx = OpContext::background();
//!
//! let (id, _plain_size, ready) = ops.ready(&ctx, &md, &my_block).await?;
//! let ptr = BlockPointer::new(id, key_gen, UserId::default());
//! ops.put(&ctx, &md, &ptr, &ready).await?;
//! let fetched: MyBlock = ops.get(&ctx, &md, &ptr).await?;
//! ```

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(feature = "adapters")]
pub mod adapters;


// Re-export key types for convenience
pub use domain::entities::{Block, EncryptedBlock, EncryptionVer, ReadyBlockData, ENCRYPTION_VER_1};
pub use domain::errors::{BlockOpsError, BlockServerError, CodecError, ConfigError, KeyError};
pub use domain::value_objects::{max_encoded_size_for, BlockOpsConfig, MAX_PLAINTEXT_BLOCK_SIZE};
pub use ports::inbound::BlockOps;
pub use ports::outbound::{BlockCodec, BlockServer, CryptoEngine, KeyResolver};
pub use service::{BlockOpsDependencies, BlockOpsService};

#[cfg(feature = "adapters")]
pub use adapters::{BincodeCodec, CryptoConfig, InMemoryBlockServer, InMemoryKeyManager, StandardCrypto};
#[cfg(feature = "adapters")]
pub use service::InMemoryBlockOps;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
