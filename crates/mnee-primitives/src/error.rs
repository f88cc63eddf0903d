/// Errors raised by key handling, hashing helpers and the wire codec.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// The private key bytes are not a valid secp256k1 scalar.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The bytes do not encode a point on the curve.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signing or signature parsing failed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The WIF string is malformed.
    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    /// A base58check checksum did not match.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The reader ran out of bytes.
    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
