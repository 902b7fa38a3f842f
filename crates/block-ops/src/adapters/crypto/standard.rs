//! # Standard Crypto Engine
//!
//! Block encryption as the filesystem stores it:
//!
//! 1. Serialize the plaintext block with the codec (`plain_size`).
//! 2. Pad to a power-of-two size class (`u32 LE length || data || zeros`).
//! 3. Seal with the configured AEAD under `server_half XOR folder_key`.
//! 4. Permanent ID = SHA-256 of the encoded envelope.
//!
//! Plaintext scratch buffers are zeroized once sealed or decoded.

use crate::domain::entities::{Block, EncryptedBlock, ENCRYPTION_VER_1};
use crate::domain::value_objects::{BlockOpsConfig, DEFAULT_MIN_PADDED_SIZE};
use crate::ports::outbound::{BlockCodec, CryptoEngine};
use rand::rngs::OsRng;
use rand::RngCore;
use shared_crypto::{
    decrypt, depad_block, encrypt, pad_block, sha256, unmask_key, Cipher, CryptoError, Nonce,
    SecretKey, KEY_LEN,
};
use shared_types::{
    BlockCryptKey, BlockCryptKeyServerHalf, BlockId, HashType, TlfCryptKey,
};
use zeroize::Zeroize;

/// Crypto engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoConfig {
    /// Cipher for new blocks.
    pub cipher: Cipher,
    /// Padding floor.
    pub min_padded_size: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            cipher: Cipher::default(),
            min_padded_size: DEFAULT_MIN_PADDED_SIZE,
        }
    }
}

impl From<&BlockOpsConfig> for CryptoConfig {
    fn from(config: &BlockOpsConfig) -> Self {
        Self {
            cipher: config.cipher,
            min_padded_size: config.min_padded_size,
        }
    }
}

/// Production crypto engine.
///
/// Generic over the codec that serializes plaintext blocks.
#[derive(Debug, Clone)]
pub struct StandardCrypto<D: BlockCodec> {
    codec: D,
    config: CryptoConfig,
}

impl<D: BlockCodec> StandardCrypto<D> {
    /// Create an engine serializing plaintext with `codec`.
    pub fn new(codec: D, config: CryptoConfig) -> Self {
        Self { codec, config }
    }

    /// Engine settings.
    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }
}

impl<D: BlockCodec> CryptoEngine for StandardCrypto<D> {
    fn make_random_server_half(&self) -> Result<BlockCryptKeyServerHalf, CryptoError> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        let half = BlockCryptKeyServerHalf::from_bytes(bytes);
        bytes.zeroize();
        Ok(half)
    }

    fn unmask_block_crypt_key(
        &self,
        server_half: &BlockCryptKeyServerHalf,
        tlf_key: &TlfCryptKey,
    ) -> Result<BlockCryptKey, CryptoError> {
        let mut bytes = unmask_key(server_half.as_bytes(), tlf_key.as_bytes());
        let key = BlockCryptKey::from_bytes(bytes);
        bytes.zeroize();
        Ok(key)
    }

    fn encrypt_block<B: Block>(
        &self,
        block: &B,
        key: &BlockCryptKey,
    ) -> Result<(usize, EncryptedBlock), CryptoError> {
        let mut encoded = self
            .codec
            .encode(block)
            .map_err(|e| CryptoError::Encoding(e.message))?;
        let plain_size = encoded.len();

        let padded = pad_block(&encoded, self.config.min_padded_size);
        encoded.zeroize();
        let mut padded = padded?;

        let secret = SecretKey::from_bytes(*key.as_bytes());
        let sealed = encrypt(self.config.cipher, &secret, &padded);
        padded.zeroize();
        let (encrypted_data, nonce) = sealed?;

        Ok((
            plain_size,
            EncryptedBlock {
                version: ENCRYPTION_VER_1,
                cipher: self.config.cipher,
                nonce: nonce.into_bytes(),
                encrypted_data,
            },
        ))
    }

    fn decrypt_block<B: Block>(
        &self,
        encrypted: &EncryptedBlock,
        key: &BlockCryptKey,
    ) -> Result<B, CryptoError> {
        if encrypted.version != ENCRYPTION_VER_1 {
            return Err(CryptoError::UnsupportedVersion(encrypted.version.0));
        }

        // Reads follow the envelope's cipher, not the configured one.
        let nonce = Nonce::from_slice(encrypted.cipher, &encrypted.nonce)?;
        let secret = SecretKey::from_bytes(*key.as_bytes());
        let mut padded = decrypt(encrypted.cipher, &secret, &encrypted.encrypted_data, &nonce)?;

        let data = depad_block(&padded);
        padded.zeroize();
        let mut data = data?;

        let block = self
            .codec
            .decode(&data)
            .map_err(|e| CryptoError::Encoding(e.message));
        data.zeroize();
        block
    }

    fn make_permanent_block_id(&self, encoded: &[u8]) -> Result<BlockId, CryptoError> {
        Ok(BlockId::new(HashType::Sha256, sha256(encoded)))
    }
}
