//! Block Server Adapters
//!
//! Implementations of the `BlockServer` trait.

mod memory;

pub use memory::InMemoryBlockServer;
