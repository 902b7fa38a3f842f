//! # Value Objects
//!
//! Configuration for the Block Operations service.
//!
//! ## Environment Variables
//!
//! - `BLOCKOPS_CIPHER`: `xchacha20poly1305` (default) or `aes256gcm`
//! - `BLOCKOPS_MIN_PADDED_SIZE`: padding floor in bytes (default: 256)
//! - `BLOCKOPS_MAX_BLOCK_SIZE`: largest encoded block accepted (default:
//!   padded 512 KiB plaintext plus tag and envelope overhead)
//! - `BLOCKOPS_VERIFY_BLOCK_IDS`: re-hash fetched blocks (default: true)

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use shared_crypto::{padded_len, Cipher, TAG_LEN};
use std::env;

/// Largest plaintext block the filesystem layer produces.
pub const MAX_PLAINTEXT_BLOCK_SIZE: usize = 512 * 1024;

/// Envelope overhead allowed on top of the sealed plaintext.
pub const ENVELOPE_OVERHEAD: usize = 4 * 1024;

/// Default padding floor.
pub const DEFAULT_MIN_PADDED_SIZE: usize = 256;

/// Smallest encoded-size limit that admits a `MAX_PLAINTEXT_BLOCK_SIZE`
/// plaintext under the given padding floor.
///
/// The length prefix is counted before rounding, so a full-size plaintext
/// lands in the next power-of-two size class.
pub fn max_encoded_size_for(min_padded_size: usize) -> usize {
    padded_len(MAX_PLAINTEXT_BLOCK_SIZE, min_padded_size) + TAG_LEN + ENVELOPE_OVERHEAD
}

/// Configuration for the block operations service.
///
/// All configuration values have sensible defaults for production use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOpsConfig {
    /// Cipher used for new blocks. Reads follow the cipher recorded in
    /// each envelope.
    pub cipher: Cipher,

    /// Smallest padded plaintext size (default: 256 bytes).
    ///
    /// Padding rounds up to the next power of two at or above this floor,
    /// so the server only learns a size class.
    pub min_padded_size: usize,

    /// Largest encoded block `ready` will hand out (default:
    /// `max_encoded_size_for(DEFAULT_MIN_PADDED_SIZE)`).
    pub max_encoded_block_size: usize,

    /// Whether `get` re-hashes fetched bytes against the pointer ID.
    pub verify_block_ids: bool,
}

impl Default for BlockOpsConfig {
    fn default() -> Self {
        Self {
            cipher: Cipher::XChaCha20Poly1305,
            min_padded_size: DEFAULT_MIN_PADDED_SIZE,
            max_encoded_block_size: max_encoded_size_for(DEFAULT_MIN_PADDED_SIZE),
            verify_block_ids: true,
        }
    }
}

impl BlockOpsConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Small limits for tests.
    pub fn for_testing() -> Self {
        Self {
            cipher: Cipher::XChaCha20Poly1305,
            min_padded_size: 64,
            max_encoded_block_size: 64 * 1024,
            verify_block_ids: true,
        }
    }

    /// Set the cipher for new blocks.
    pub fn with_cipher(mut self, cipher: Cipher) -> Self {
        self.cipher = cipher;
        self
    }

    /// Set the padding floor.
    pub fn with_min_padded_size(mut self, size: usize) -> Self {
        self.min_padded_size = size;
        self
    }

    /// Set the maximum encoded block size.
    pub fn with_max_encoded_block_size(mut self, size: usize) -> Self {
        self.max_encoded_block_size = size;
        self
    }

    /// Enable or disable ID verification on `get`.
    pub fn with_verify_block_ids(mut self, verify: bool) -> Self {
        self.verify_block_ids = verify;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// Unset variables keep their defaults. The result is validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BLOCKOPS_CIPHER") {
            config.cipher = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "BLOCKOPS_CIPHER",
                value,
            })?;
        }
        if let Some(value) = lookup("BLOCKOPS_MIN_PADDED_SIZE") {
            config.min_padded_size = parse_var("BLOCKOPS_MIN_PADDED_SIZE", value)?;
        }
        if let Some(value) = lookup("BLOCKOPS_MAX_BLOCK_SIZE") {
            config.max_encoded_block_size = parse_var("BLOCKOPS_MAX_BLOCK_SIZE", value)?;
        }
        if let Some(value) = lookup("BLOCKOPS_VERIFY_BLOCK_IDS") {
            config.verify_block_ids = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "BLOCKOPS_VERIFY_BLOCK_IDS",
                        value,
                    })
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_padded_size == 0 || !self.min_padded_size.is_power_of_two() {
            return Err(ConfigError::InvalidPaddedSize(self.min_padded_size));
        }
        if self.max_encoded_block_size < self.min_padded_size {
            return Err(ConfigError::MaxBelowMin {
                max: self.max_encoded_block_size,
                min: self.min_padded_size,
            });
        }
        Ok(())
    }
}

fn parse_var(var: &'static str, value: String) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}
