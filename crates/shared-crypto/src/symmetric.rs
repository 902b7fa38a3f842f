//! # Symmetric Encryption
//!
//! Provides XChaCha20-Poly1305 (default) and AES-256-GCM encryption.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time ARX design
//! - **AES-GCM**: 96-bit nonce, use only with AES-NI hardware acceleration
//!
//! Both ciphers append a 16-byte authentication tag, so ciphertext is never
//! shorter than plaintext.

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Byte length of a symmetric key.
pub const KEY_LEN: usize = 32;

/// Byte length of the AEAD authentication tag (both ciphers).
pub const TAG_LEN: usize = 16;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Cipher selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cipher {
    /// XChaCha20-Poly1305 (default, side-channel immune)
    #[default]
    XChaCha20Poly1305,
    /// AES-256-GCM (use with AES-NI only)
    Aes256Gcm,
}

impl Cipher {
    /// Nonce length required by this cipher.
    pub fn nonce_len(self) -> usize {
        match self {
            Cipher::XChaCha20Poly1305 => 24,
            Cipher::Aes256Gcm => 12,
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cipher::XChaCha20Poly1305 => f.write_str("xchacha20poly1305"),
            Cipher::Aes256Gcm => f.write_str("aes256gcm"),
        }
    }
}

impl FromStr for Cipher {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "xchacha20poly1305" => Ok(Cipher::XChaCha20Poly1305),
            "aes256gcm" => Ok(Cipher::Aes256Gcm),
            other => Err(CryptoError::InvalidInput(format!("unknown cipher {other}"))),
        }
    }
}

/// Nonce for encryption, sized for the cipher that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce(Vec<u8>);

impl Nonce {
    /// Wrap received bytes, checking the length for `cipher`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidNonceLength` on a size mismatch.
    pub fn from_slice(cipher: Cipher, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != cipher.nonce_len() {
            return Err(CryptoError::InvalidNonceLength {
                expected: cipher.nonce_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Generate random nonce (safe with XChaCha20's 192-bit nonce).
    pub fn generate(cipher: Cipher) -> Self {
        let mut bytes = vec![0u8; cipher.nonce_len()];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take inner bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Encrypt plaintext with the chosen cipher.
///
/// Returns (ciphertext, nonce).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(
    cipher: Cipher,
    key: &SecretKey,
    plaintext: &[u8],
) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let nonce = Nonce::generate(cipher);

    let ciphertext = match cipher {
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext),
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .encrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), plaintext),
    }
    .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext with the chosen cipher.
///
/// # Errors
///
/// Returns `CryptoError::InvalidNonceLength` if the nonce does not fit the
/// cipher, `CryptoError::DecryptionFailed` if authentication fails.
pub fn decrypt(
    cipher: Cipher,
    key: &SecretKey,
    ciphertext: &[u8],
    nonce: &Nonce,
) -> Result<Vec<u8>, CryptoError> {
    if nonce.as_bytes().len() != cipher.nonce_len() {
        return Err(CryptoError::InvalidNonceLength {
            expected: cipher.nonce_len(),
            actual: nonce.as_bytes().len(),
        });
    }

    match cipher {
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext),
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .decrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), ciphertext),
    }
    .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
