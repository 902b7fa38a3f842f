//! # Error Types
//!
//! Errors raised while building shared identifiers.

use thiserror::Error;

/// Errors parsing or constructing folder and block identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    /// Input is not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length is wrong.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Block ID carries an unknown hash type byte.
    #[error("Unknown hash type: {0}")]
    UnknownHashType(u8),

    /// Folder ID suffix is neither private nor public.
    #[error("Invalid TLF ID suffix: {0:#04x}")]
    InvalidTlfSuffix(u8),
}
