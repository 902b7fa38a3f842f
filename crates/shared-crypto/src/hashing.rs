//! # SHA-256 Hashing
//!
//! Content hashing for permanent block identifiers.

use sha2::{Digest, Sha256};

/// SHA-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}
