//! Token system configuration.
//!
//! The ledger serves a loosely-typed [`SystemConfig`]; transfers need the
//! validated [`TokenConfig`] derived from it.

use serde::{Deserialize, Serialize};

use mnee_primitives::ec::PublicKey;
use mnee_script::Address;

use crate::MneeError;

/// Inclusive `[min, max]` bracket on the transfer amount and its fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Lower bound, inclusive.
    pub min: u64,
    /// Upper bound, inclusive.
    pub max: u64,
    /// Fee in atomic units.
    pub fee: u64,
}

impl FeeTier {
    /// True if `amount` falls inside the bracket.
    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// First tier, in config order, that contains `amount`.
pub fn tier_for(tiers: &[FeeTier], amount: u64) -> Option<&FeeTier> {
    tiers.iter().find(|t| t.contains(amount))
}

/// Configuration as served by `GET /v1/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Token decimals.
    #[serde(default)]
    pub decimals: u8,
    /// Approver public key, compressed hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<String>,
    /// Address collecting transfer fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_address: Option<String>,
    /// Burn address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_address: Option<String>,
    /// Mint address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_address: Option<String>,
    /// Token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Fee schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<Vec<FeeTier>>,
}

/// Configuration with every field a transfer needs, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token decimals.
    pub decimals: u8,
    /// Approver key embedded in every cosign lock.
    pub approver: PublicKey,
    /// Fee destination.
    pub fee_address: Address,
    /// Token id written into every transfer inscription.
    pub token_id: String,
    /// Fee schedule, in config order.
    pub fee_tiers: Vec<FeeTier>,
    /// Burn address, unparsed.
    pub burn_address: Option<String>,
    /// Mint address, unparsed.
    pub mint_address: Option<String>,
}

impl TokenConfig {
    /// First fee tier containing `amount`.
    pub fn tier_for(&self, amount: u64) -> Option<&FeeTier> {
        tier_for(&self.fee_tiers, amount)
    }
}

impl TryFrom<&SystemConfig> for TokenConfig {
    type Error = MneeError;

    fn try_from(raw: &SystemConfig) -> Result<Self, Self::Error> {
        let approver = raw
            .approver
            .as_deref()
            .ok_or_else(|| MneeError::ConfigInvalid("missing approver".into()))?;
        let fee_address = raw
            .fee_address
            .as_deref()
            .ok_or_else(|| MneeError::ConfigInvalid("missing fee address".into()))?;
        let token_id = raw
            .token_id
            .as_ref()
            .ok_or_else(|| MneeError::ConfigInvalid("missing token id".into()))?;
        let fees = raw
            .fees
            .as_ref()
            .ok_or_else(|| MneeError::ConfigInvalid("missing fees".into()))?;

        let approver = PublicKey::from_hex(approver)
            .map_err(|e| MneeError::ConfigInvalid(format!("approver: {}", e)))?;
        let fee_address = Address::from_string(fee_address)
            .map_err(|e| MneeError::ConfigInvalid(format!("fee address: {}", e)))?;

        Ok(TokenConfig {
            decimals: raw.decimals,
            approver,
            fee_address,
            token_id: token_id.clone(),
            fee_tiers: fees.clone(),
            burn_address: raw.burn_address.clone(),
            mint_address: raw.mint_address.clone(),
        })
    }
}

impl TryFrom<SystemConfig> for TokenConfig {
    type Error = MneeError;

    fn try_from(raw: SystemConfig) -> Result<Self, Self::Error> {
        TokenConfig::try_from(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPROVER: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn full() -> SystemConfig {
        serde_json::from_str(&format!(
            r#"{{"decimals":5,"approver":"{}","feeAddress":"1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr",
                "tokenId":"tok_0","fees":[{{"min":0,"max":999,"fee":0}},{{"min":1000,"max":10000,"fee":10}}]}}"#,
            APPROVER
        ))
        .unwrap()
    }

    #[test]
    fn test_full_config_validates() {
        let cfg = TokenConfig::try_from(&full()).unwrap();
        assert_eq!(cfg.decimals, 5);
        assert_eq!(cfg.token_id, "tok_0");
        assert_eq!(cfg.approver.to_hex(), APPROVER);
        assert_eq!(cfg.tier_for(1000).map(|t| t.fee), Some(10));
        assert_eq!(cfg.tier_for(0).map(|t| t.fee), Some(0));
        assert!(cfg.tier_for(10_001).is_none());
    }

    #[test]
    fn test_each_missing_field_is_config_invalid() {
        let mut a = full();
        a.approver = None;
        let mut b = full();
        b.fee_address = None;
        let mut c = full();
        c.token_id = None;
        let mut d = full();
        d.fees = None;
        for raw in [a, b, c, d] {
            assert!(matches!(
                TokenConfig::try_from(&raw),
                Err(MneeError::ConfigInvalid(_))
            ));
        }
    }

    #[test]
    fn test_unparsable_values_are_config_invalid() {
        let mut bad_key = full();
        bad_key.approver = Some("02abcd".into());
        assert!(matches!(
            TokenConfig::try_from(&bad_key),
            Err(MneeError::ConfigInvalid(m)) if m.starts_with("approver")
        ));

        let mut bad_addr = full();
        bad_addr.fee_address = Some("not-an-address".into());
        assert!(matches!(
            TokenConfig::try_from(bad_addr),
            Err(MneeError::ConfigInvalid(m)) if m.starts_with("fee address")
        ));
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let tiers = [
            FeeTier { min: 0, max: 100, fee: 1 },
            FeeTier { min: 50, max: 200, fee: 2 },
        ];
        assert_eq!(tier_for(&tiers, 75).map(|t| t.fee), Some(1));
        assert_eq!(tier_for(&tiers, 150).map(|t| t.fee), Some(2));
        assert!(FeeTier { min: 5, max: 5, fee: 0 }.contains(5));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(full()).unwrap();
        assert!(json.get("feeAddress").is_some());
        assert!(json.get("tokenId").is_some());
        assert!(json.get("burnAddress").is_none());
    }
}
