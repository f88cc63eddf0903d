//! Recognizes MNEE token scripts from their ASM rendering.
//!
//! Classification never fails: anything that does not match the inscription
//! grammar exactly is [`Classification::NotAToken`].

use serde::{Deserialize, Serialize};

use mnee_script::Script;

use crate::config::SystemConfig;
use crate::inscription::{OP_DEPLOY_MINT, OP_TRANSFER, PROTOCOL};

/// Leading tokens shared by every MNEE inscription; `None` is the payload.
const ENVELOPE: [Option<&str>; 8] = [
    Some("OP_FALSE"),
    Some("OP_IF"),
    Some("6f7264"),
    Some("OP_TRUE"),
    Some("6170706c69636174696f6e2f6273762d3230"),
    Some("OP_FALSE"),
    None,
    Some("OP_ENDIF"),
];

const PAYLOAD_INDEX: usize = 6;
const INLINE_LEN: usize = 13;
const COSIGN_LEN: usize = 15;

/// Transfer record carried in a token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInscription {
    /// Protocol tag.
    #[serde(default)]
    pub p: String,
    /// Operation.
    #[serde(default)]
    pub op: String,
    /// Decimals, as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<String>,
    /// Amount as a decimal string.
    #[serde(default)]
    pub amt: String,
    /// Token id.
    #[serde(default)]
    pub id: String,
}

/// Supply metadata of a deploy/mint record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Supply after this action.
    #[serde(default, rename = "currentSupply", skip_serializing_if = "Option::is_none")]
    pub current_supply: Option<String>,
    /// `mint` or `redeem`.
    #[serde(default)]
    pub action: String,
    /// Metadata version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Deploy/mint record carried in a token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployInscription {
    /// Protocol tag.
    #[serde(default)]
    pub p: String,
    /// Operation.
    #[serde(default)]
    pub op: String,
    /// Decimals, as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<String>,
    /// Amount as a decimal string.
    #[serde(default)]
    pub amt: String,
    /// Token id.
    #[serde(default)]
    pub id: String,
    /// Supply metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

/// Outcome of classifying a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not an MNEE output.
    NotAToken,
    /// A valid transfer output.
    Transfer(TransferInscription),
    /// A valid deploy, mint or redeem output.
    DeployOrMint(DeployInscription),
}

impl Classification {
    /// True unless `NotAToken`.
    pub fn is_token(&self) -> bool {
        !matches!(self, Classification::NotAToken)
    }
}

/// Classifies scripts against one configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScriptValidator<'a> {
    config: &'a SystemConfig,
}

impl<'a> ScriptValidator<'a> {
    /// Validator checking the approver and token id of `config`.
    pub fn new(config: &'a SystemConfig) -> Self {
        ScriptValidator { config }
    }

    /// Classify a script's ASM split on single spaces.
    pub fn classify_asm(&self, asm: &str) -> Classification {
        let tokens: Vec<&str> = asm.split(' ').collect();
        self.classify(&tokens)
    }

    /// Classify a script by rendering its ASM first.
    pub fn classify_script(&self, script: &Script) -> Classification {
        self.classify_asm(&script.to_asm())
    }

    /// Classify pre-split ASM tokens.
    pub fn classify(&self, tokens: &[&str]) -> Classification {
        if tokens.len() != INLINE_LEN && tokens.len() != COSIGN_LEN {
            return Classification::NotAToken;
        }
        let envelope_ok = ENVELOPE
            .iter()
            .zip(tokens)
            .all(|(want, got)| want.map_or(true, |w| w == *got));
        if !envelope_ok || !self.lock_ok(&tokens[ENVELOPE.len()..]) {
            return Classification::NotAToken;
        }
        self.classify_payload(tokens[PAYLOAD_INDEX])
    }

    fn lock_ok(&self, lock: &[&str]) -> bool {
        match lock.len() {
            // a plain P2PKH tail has no approver key, so it can pass the
            // shape check but never the approver check
            5 => {
                let is_p2pkh = Script::from_asm(&lock.join(" ")).is_ok_and(|s| s.is_p2pkh());
                is_p2pkh && self.cosign_ok(lock)
            }
            7 => self.cosign_ok(lock),
            _ => false,
        }
    }

    fn cosign_ok(&self, lock: &[&str]) -> bool {
        let [dup, hash160, _pkh, equal_verify, checksig_verify, approver, checksig] = lock else {
            return false;
        };
        *dup == "OP_DUP"
            && *hash160 == "OP_HASH160"
            && *equal_verify == "OP_EQUALVERIFY"
            && *checksig_verify == "OP_CHECKSIGVERIFY"
            && *checksig == "OP_CHECKSIG"
            && self.config.approver.as_deref() == Some(*approver)
    }

    fn classify_payload(&self, payload_hex: &str) -> Classification {
        let Ok(payload) = hex::decode(payload_hex) else {
            return Classification::NotAToken;
        };

        if let Ok(transfer) = serde_json::from_slice::<TransferInscription>(&payload) {
            if transfer.p == PROTOCOL
                && transfer.op == OP_TRANSFER
                && is_positive_integer(&transfer.amt)
                && self.token_id_matches(&transfer.id)
            {
                return Classification::Transfer(transfer);
            }
        }

        if let Ok(deploy) = serde_json::from_slice::<DeployInscription>(&payload) {
            let action_ok = deploy
                .metadata
                .as_ref()
                .is_some_and(|m| m.action == "mint" || m.action == "redeem");
            if deploy.p == PROTOCOL
                && deploy.op == OP_DEPLOY_MINT
                && is_positive_integer(&deploy.amt)
                && self.token_id_matches(&deploy.id)
                && action_ok
            {
                return Classification::DeployOrMint(deploy);
            }
        }

        Classification::NotAToken
    }

    fn token_id_matches(&self, id: &str) -> bool {
        self.config.token_id.as_deref() == Some(id)
    }
}

/// Unsigned base-10 integer that fits a u64 and is not zero.
fn is_positive_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.parse::<u64>().is_ok_and(|n| n > 0)
}
