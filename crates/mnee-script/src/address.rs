//! Base58check P2PKH addresses.
//!
//! MNEE recipients and change owners are identified by these strings; the
//! 20-byte hash inside is what the cosign locking script commits to.

use std::fmt;
use std::str::FromStr;

use mnee_primitives::ec::PublicKey;
use mnee_primitives::hash::checksum;

use crate::ScriptError;

/// Mainnet P2PKH version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Version 0x00, addresses start with '1'.
    Mainnet,
    /// Version 0x6f, addresses start with 'm' or 'n'.
    Testnet,
}

/// A P2PKH address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// Base58check string form.
    pub address_string: String,
    /// Hash160 of the owner's public key.
    pub public_key_hash: [u8; 20],
    /// Network from the version byte.
    pub network: Network,
}

impl Address {
    /// Parse and checksum-verify a base58check address.
    ///
    /// # Arguments
    /// * `addr` - Address string.
    ///
    /// # Returns
    /// The address, or `InvalidAddress`, `ChecksumFailed` or
    /// `UnsupportedVersion`.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|e| ScriptError::InvalidAddress(format!("{}: {}", addr, e)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddress(format!(
                "{}: decoded length {}",
                addr,
                decoded.len()
            )));
        }
        if checksum(&decoded[..21]) != decoded[21..] {
            return Err(ScriptError::ChecksumFailed);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            v => return Err(ScriptError::UnsupportedVersion(v)),
        };

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&decoded[1..21]);
        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            network,
        })
    }

    /// Encode a public key hash for `network`.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let version = match network {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        };
        let mut payload = Vec::with_capacity(25);
        payload.push(version);
        payload.extend_from_slice(hash);
        let check = checksum(&payload);
        payload.extend_from_slice(&check);

        Address {
            address_string: bs58::encode(&payload).into_string(),
            public_key_hash: *hash,
            network,
        }
    }

    /// Address of a public key's compressed encoding.
    pub fn from_public_key(pub_key: &PublicKey, mainnet: bool) -> Self {
        let network = if mainnet {
            Network::Mainnet
        } else {
            Network::Testnet
        };
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
