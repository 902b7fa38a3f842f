//! # Key Material
//!
//! The three keys involved in block encryption:
//!
//! - `TlfCryptKey`: the folder's symmetric key for one key generation.
//!   Never disclosed to the block server.
//! - `BlockCryptKeyServerHalf`: random per-block half stored next to the
//!   ciphertext on the block server. Useless without the folder key.
//! - `BlockCryptKey`: the content key, `server_half XOR folder_key`.
//!   Derived client-side per call and never persisted, so it deliberately
//!   has no `Serialize` impl.
//!
//! All key types are wiped on drop and redact their `Debug` output.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of every symmetric key in this module.
pub const KEY_BYTE_LEN: usize = 32;

macro_rules! redacted_debug {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "(<redacted>)"))
            }
        }
    };
}

/// Symmetric key of a folder at one key generation.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct TlfCryptKey([u8; KEY_BYTE_LEN]);

/// Well-known key shared by every public folder.
pub const PUBLIC_TLF_CRYPT_KEY: TlfCryptKey = TlfCryptKey([0u8; KEY_BYTE_LEN]);

impl TlfCryptKey {
    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; KEY_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_BYTE_LEN] {
        &self.0
    }
}

redacted_debug!(TlfCryptKey);

/// Per-block random key half stored by the block server.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct BlockCryptKeyServerHalf([u8; KEY_BYTE_LEN]);

impl BlockCryptKeyServerHalf {
    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; KEY_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_BYTE_LEN] {
        &self.0
    }
}

redacted_debug!(BlockCryptKeyServerHalf);

/// Content key of one block.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BlockCryptKey([u8; KEY_BYTE_LEN]);

impl BlockCryptKey {
    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; KEY_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_BYTE_LEN] {
        &self.0
    }
}

redacted_debug!(BlockCryptKey);
