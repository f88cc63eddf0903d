//! secp256k1 private key with WIF import/export.
//!
//! Signing keys for MNEE inputs arrive as WIF strings; this module decodes
//! them and signs 32-byte signature hashes with RFC6979 nonces.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::checksum;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Mainnet WIF prefix byte.
const MAINNET_PREFIX: u8 = 0x80;

/// Flag byte appended to WIF payloads that describe a compressed public key.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a random key from the OS RNG.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - Big-endian scalar, exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the scalar is non-zero and below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let mut bytes = hex::decode(hex_str)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Decode a WIF (Wallet Import Format) string.
    ///
    /// Accepts both the compressed form (prefix + key + 0x01 + checksum,
    /// 38 bytes) and the uncompressed form (37 bytes). The network prefix
    /// byte is not checked.
    ///
    /// # Arguments
    /// * `wif` - Base58check encoded key.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, or `InvalidWif` / `ChecksumMismatch`.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let mut decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| PrimitivesError::InvalidWif(e.to_string()))?;

        let payload_len = match decoded.len() {
            38 if decoded[33] == COMPRESS_MAGIC => 34,
            38 => {
                return Err(PrimitivesError::InvalidWif(
                    "malformed private key: invalid compression flag".to_string(),
                ))
            }
            37 => 33,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    n
                )))
            }
        };

        if checksum(&decoded[..payload_len]) != decoded[payload_len..] {
            decoded.zeroize();
            return Err(PrimitivesError::ChecksumMismatch);
        }

        let key = Self::from_bytes(&decoded[1..1 + PRIVATE_KEY_BYTES_LEN]);
        decoded.zeroize();
        key
    }

    /// Encode as a compressed mainnet WIF string.
    pub fn to_wif(&self) -> String {
        self.to_wif_prefix(MAINNET_PREFIX)
    }

    /// Encode as a compressed WIF string with a custom network prefix
    /// (0x80 mainnet, 0xef testnet).
    pub fn to_wif_prefix(&self, prefix: u8) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 6);
        payload.push(prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);
        let check = checksum(&payload);
        payload.extend_from_slice(&check);

        let encoded = bs58::encode(&payload).into_string();
        payload.zeroize();
        encoded
    }

    /// The 32-byte big-endian scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// The scalar as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The matching public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// Sign a 32-byte digest with a deterministic (RFC6979) nonce.
    ///
    /// The resulting signature is low-S normalized.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, &self.inner)
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
