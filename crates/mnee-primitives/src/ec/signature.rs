//! ECDSA signatures with DER serialization.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{self, SigningKey, VerifyingKey};

use crate::PrimitivesError;

/// An ECDSA signature over secp256k1, always in low-S form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    pub(crate) fn sign(hash: &[u8; 32], key: &SigningKey) -> Result<Self, PrimitivesError> {
        let inner: ecdsa::Signature = key
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner })
    }

    pub(crate) fn verify(&self, hash: &[u8; 32], key: &VerifyingKey) -> bool {
        key.verify_prehash(hash, &self.inner).is_ok()
    }

    /// Big-endian R component.
    pub fn r(&self) -> [u8; 32] {
        self.inner.split_bytes().0.into()
    }

    /// Big-endian S component.
    pub fn s(&self) -> [u8; 32] {
        self.inner.split_bytes().1.into()
    }

    /// Strict DER encoding: `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`.
    pub fn to_der(&self) -> Vec<u8> {
        let rb = canonical_int(&self.r());
        let sb = canonical_int(&self.s());

        let mut out = Vec::with_capacity(6 + rb.len() + sb.len());
        out.push(0x30);
        out.push((4 + rb.len() + sb.len()) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }
}

/// Minimal big-endian integer for DER: leading zeros stripped, one 0x00
/// re-added when the high bit would otherwise mark it negative.
fn canonical_int(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|b| *b != 0).unwrap_or(31);
    let trimmed = &val[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}
