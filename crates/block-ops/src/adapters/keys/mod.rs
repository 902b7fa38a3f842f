//! Key Resolver Adapters
//!
//! Implementations of the `KeyResolver` trait.

mod memory;

pub use memory::InMemoryKeyManager;
