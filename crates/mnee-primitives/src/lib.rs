#![deny(missing_docs)]

//! Cryptographic building blocks for the MNEE SDK.
//!
//! - secp256k1 private/public keys with WIF import and compressed encoding
//! - deterministic ECDSA signing with DER output
//! - SHA-256, double SHA-256, RIPEMD-160 and Hash160
//! - Bitcoin varints plus a little-endian wire reader/writer

pub mod ec;
pub mod hash;
pub mod util;

mod error;
pub use error::PrimitivesError;
