//! # Core Domain Entities
//!
//! Folder and block vocabulary shared by the block operations layer and
//! the filesystem layers above it.
//!
//! ## Clusters
//!
//! - **Folders**: `TlfId`, `KeyGen`, `RootMetadata`
//! - **Blocks**: `BlockId`, `HashType`, `BlockRefNonce`, `DataVer`, `BlockPointer`

use crate::errors::ParseIdError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: FOLDERS
// =============================================================================

/// Byte length of a folder identifier.
pub const TLF_ID_BYTE_LEN: usize = 16;

/// Suffix byte of a private folder ID.
pub const TLF_ID_SUFFIX_PRIVATE: u8 = 0x16;

/// Suffix byte of a public folder ID.
pub const TLF_ID_SUFFIX_PUBLIC: u8 = 0x17;

/// Identifier of a top-level folder (TLF).
///
/// The last byte encodes whether the folder is public or private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TlfId([u8; TLF_ID_BYTE_LEN]);

impl TlfId {
    /// Build an ID from raw bytes, checking the suffix.
    pub fn from_bytes(bytes: [u8; TLF_ID_BYTE_LEN]) -> Result<Self, ParseIdError> {
        match bytes[TLF_ID_BYTE_LEN - 1] {
            TLF_ID_SUFFIX_PRIVATE | TLF_ID_SUFFIX_PUBLIC => Ok(Self(bytes)),
            suffix => Err(ParseIdError::InvalidTlfSuffix(suffix)),
        }
    }

    /// Deterministic ID for tests: `n` in the first byte.
    pub fn fake(n: u8, public: bool) -> Self {
        let mut bytes = [0u8; TLF_ID_BYTE_LEN];
        bytes[0] = n;
        bytes[TLF_ID_BYTE_LEN - 1] = if public {
            TLF_ID_SUFFIX_PUBLIC
        } else {
            TLF_ID_SUFFIX_PRIVATE
        };
        Self(bytes)
    }

    /// Whether this is a public folder.
    pub fn is_public(&self) -> bool {
        self.0[TLF_ID_BYTE_LEN - 1] == TLF_ID_SUFFIX_PUBLIC
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; TLF_ID_BYTE_LEN] {
        &self.0
    }
}

impl fmt::Display for TlfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for TlfId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
        let bytes: [u8; TLF_ID_BYTE_LEN] =
            raw.try_into().map_err(|raw: Vec<u8>| ParseIdError::InvalidLength {
                expected: TLF_ID_BYTE_LEN,
                actual: raw.len(),
            })?;
        Self::from_bytes(bytes)
    }
}

/// A folder key generation.
///
/// Generations start at [`FIRST_VALID_KEY_GEN`] and increase on every key
/// rotation. Public folders use [`PUBLIC_KEY_GEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyGen(pub i32);

/// Key generation used by every block of a public folder.
pub const PUBLIC_KEY_GEN: KeyGen = KeyGen(-1);

/// Placeholder for a pointer that has not been assigned a generation.
pub const UNSPECIFIED_KEY_GEN: KeyGen = KeyGen(0);

/// First generation of a private folder.
pub const FIRST_VALID_KEY_GEN: KeyGen = KeyGen(1);

impl fmt::Display for KeyGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Folder state as seen by the block layer.
///
/// The block layer only reads it: the folder ID scopes server calls and the
/// latest key generation drives encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootMetadata {
    /// Folder identifier.
    pub id: TlfId,
    /// Metadata revision.
    pub revision: u64,
    /// Latest key generation of a private folder.
    pub latest_key_gen: KeyGen,
}

impl RootMetadata {
    /// New metadata at the first revision.
    pub fn new(id: TlfId, latest_key_gen: KeyGen) -> Self {
        Self {
            id,
            revision: 1,
            latest_key_gen,
        }
    }

    /// Generation new blocks are encrypted with.
    pub fn latest_key_generation(&self) -> KeyGen {
        if self.id.is_public() {
            PUBLIC_KEY_GEN
        } else {
            self.latest_key_gen
        }
    }
}

// =============================================================================
// CLUSTER B: BLOCKS
// =============================================================================

/// Hash function used to derive a permanent block ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashType {
    /// Never valid; zero value.
    Invalid = 0,
    /// SHA-256 over the encoded ciphertext.
    Sha256 = 1,
}

impl TryFrom<u8> for HashType {
    type Error = ParseIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HashType::Sha256),
            other => Err(ParseIdError::UnknownHashType(other)),
        }
    }
}

/// Byte length of a block ID digest.
pub const BLOCK_ID_DIGEST_LEN: usize = 32;

/// Permanent, content-derived block identifier.
///
/// Always the hash of the exact encoded ciphertext stored under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId {
    hash_type: HashType,
    digest: [u8; BLOCK_ID_DIGEST_LEN],
}

impl BlockId {
    /// Wrap a digest produced by `hash_type`.
    pub fn new(hash_type: HashType, digest: [u8; BLOCK_ID_DIGEST_LEN]) -> Self {
        Self { hash_type, digest }
    }

    /// Deterministic ID for tests.
    pub fn fake(n: u8) -> Self {
        Self::new(HashType::Sha256, [n; BLOCK_ID_DIGEST_LEN])
    }

    /// Hash function that produced the digest.
    pub fn hash_type(&self) -> HashType {
        self.hash_type
    }

    /// Raw digest.
    pub fn digest(&self) -> &[u8; BLOCK_ID_DIGEST_LEN] {
        &self.digest
    }

    /// Whether the ID carries a usable hash type.
    pub fn is_valid(&self) -> bool {
        self.hash_type != HashType::Invalid
    }

    /// `hash type byte || digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + BLOCK_ID_DIGEST_LEN);
        out.push(self.hash_type as u8);
        out.extend_from_slice(&self.digest);
        out
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl FromStr for BlockId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
        if raw.len() != 1 + BLOCK_ID_DIGEST_LEN {
            return Err(ParseIdError::InvalidLength {
                expected: 1 + BLOCK_ID_DIGEST_LEN,
                actual: raw.len(),
            });
        }
        let hash_type = HashType::try_from(raw[0])?;
        let mut digest = [0u8; BLOCK_ID_DIGEST_LEN];
        digest.copy_from_slice(&raw[1..]);
        Ok(Self::new(hash_type, digest))
    }
}

/// Byte length of a reference nonce.
pub const BLOCK_REF_NONCE_LEN: usize = 8;

/// Distinguishes logical references to the same stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockRefNonce(pub [u8; BLOCK_REF_NONCE_LEN]);

/// Nonce of the original stored instance of a block.
pub const ZERO_BLOCK_REF_NONCE: BlockRefNonce = BlockRefNonce([0u8; BLOCK_REF_NONCE_LEN]);

impl BlockRefNonce {
    /// Fresh non-zero nonce for an additional reference.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut bytes = [0u8; BLOCK_REF_NONCE_LEN];
            rng.fill_bytes(&mut bytes);
            let nonce = BlockRefNonce(bytes);
            if !nonce.is_zero() {
                return nonce;
            }
        }
    }

    /// Whether this is the original-instance nonce.
    pub fn is_zero(&self) -> bool {
        *self == ZERO_BLOCK_REF_NONCE
    }
}

impl fmt::Display for BlockRefNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Version of the data format inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DataVer(pub u32);

/// First valid data version.
pub const FIRST_VALID_DATA_VER: DataVer = DataVer(1);

/// Identifier of the user that created a block reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

/// Points at one logical instance of a stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPointer {
    /// Permanent content hash of the ciphertext.
    pub id: BlockId,
    /// Folder key generation the block was encrypted with.
    pub key_gen: KeyGen,
    /// Data format version.
    pub data_ver: DataVer,
    /// Creator of this reference.
    pub creator: UserId,
    /// Zero for the original instance, non-zero for extra references.
    pub ref_nonce: BlockRefNonce,
}

impl BlockPointer {
    /// Pointer to the original instance of `id`.
    pub fn new(id: BlockId, key_gen: KeyGen, creator: UserId) -> Self {
        Self {
            id,
            key_gen,
            data_ver: FIRST_VALID_DATA_VER,
            creator,
            ref_nonce: ZERO_BLOCK_REF_NONCE,
        }
    }

    /// Copy of this pointer registered as an additional reference.
    pub fn with_new_ref(&self) -> Self {
        Self {
            ref_nonce: BlockRefNonce::random(),
            ..*self
        }
    }

    /// Whether the pointer has a valid ID.
    pub fn is_initialized(&self) -> bool {
        self.id.is_valid()
    }

    /// Whether this pointer names the original stored instance.
    pub fn is_first_ref(&self) -> bool {
        self.ref_nonce.is_zero()
    }
}
