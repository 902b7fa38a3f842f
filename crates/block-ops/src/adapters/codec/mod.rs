//! Codec Adapters
//!
//! Implementations of the `BlockCodec` trait.

mod bincode;

pub use self::bincode::BincodeCodec;
