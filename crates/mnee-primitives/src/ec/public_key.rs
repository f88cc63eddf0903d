//! secp256k1 public key.
//!
//! The MNEE approver key travels as compressed hex in the token config and
//! is embedded verbatim in every cosign locking script.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
pub const COMPRESSED_LEN: usize = 33;

/// A secp256k1 public key.
#[derive(Clone, Copy)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse SEC1 bytes, compressed (33) or uncompressed (65).
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded point.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if the bytes describe a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            ));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    /// Parse a hex-encoded SEC1 point.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Compressed SEC1 encoding: 0x02/0x03 followed by the x-coordinate.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Compressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Hash160 of the compressed encoding.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Verify `sig` over a 32-byte digest.
    pub fn verify(&self, hash: &[u8; 32], sig: &Signature) -> bool {
        sig.verify(hash, &self.inner)
    }

    pub(crate) fn from_verifying_key(inner: VerifyingKey) -> Self {
        PublicKey { inner }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    #[test]
    fn test_compressed_and_uncompressed_parse_to_same_key() {
        let a = PublicKey::from_hex(GENERATOR_COMPRESSED).unwrap();
        let b = PublicKey::from_hex(GENERATOR_UNCOMPRESSED).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_hex(), GENERATOR_COMPRESSED);
    }

    #[test]
    fn test_rejects_invalid_points() {
        assert!(PublicKey::from_bytes(&[]).is_err());
        assert!(PublicKey::from_hex("zz").is_err());
        // x-coordinate above the field prime
        assert!(PublicKey::from_hex(&format!("02{}", "ff".repeat(32))).is_err());
        // truncated
        assert!(PublicKey::from_hex(&GENERATOR_COMPRESSED[..64]).is_err());
    }

    #[test]
    fn test_hash160() {
        let pk = PublicKey::from_hex(GENERATOR_COMPRESSED).unwrap();
        assert_eq!(hex::encode(pk.hash160()), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }
}
