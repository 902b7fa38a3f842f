//! # Shared Crypto - Block Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305, AES-GCM | Block encryption |
//! | `hashing` | SHA-256 | Permanent block IDs |
//! | `key_split` | XOR | Server half / folder key split |
//! | `padding` | Power-of-two | Length hiding |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit nonce, constant-time, side-channel immune
//! - **Key split**: server half is uniformly random, useless alone
//! - **Padding**: the server only learns a power-of-two size class

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod key_split;
pub mod padding;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, Hash};
pub use key_split::{unmask_key, xor_keys};
pub use padding::{depad_block, pad_block, padded_len};
pub use symmetric::{decrypt, encrypt, Cipher, Nonce, SecretKey, KEY_LEN, TAG_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
