//! # Adapters Module
//!
//! Reference implementations of the driven ports.
//!
//! ## Modules
//!
//! - `codec`: `BincodeCodec` envelope codec
//! - `crypto`: `StandardCrypto` engine (AEAD, XOR key split, SHA-256 IDs)
//! - `keys`: `InMemoryKeyManager` folder key history
//! - `server`: `InMemoryBlockServer` reference-counted block store

pub mod codec;
pub mod crypto;
pub mod keys;
pub mod server;

pub use codec::BincodeCodec;
pub use crypto::{CryptoConfig, StandardCrypto};
pub use keys::InMemoryKeyManager;
pub use server::InMemoryBlockServer;
