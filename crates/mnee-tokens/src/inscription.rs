//! Builders for MNEE output scripts.
//!
//! Every token output is an ordinals envelope carrying a BSV-20 JSON
//! payload, followed by a lock that needs both the owner's and the
//! approver's signature:
//!
//! ```text
//! OP_FALSE OP_IF "ord" OP_TRUE "application/bsv-20" OP_FALSE <json> OP_ENDIF
//! OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIGVERIFY <approver> OP_CHECKSIG
//! ```

use serde::Serialize;

use mnee_primitives::ec::PublicKey;
use mnee_script::opcodes::*;
use mnee_script::{Address, Script, ScriptError};

use crate::config::TokenConfig;

/// Envelope marker pushed after `OP_IF`.
pub const ORD_MARKER: &[u8] = b"ord";

/// Content type of every MNEE inscription.
pub const CONTENT_TYPE: &str = "application/bsv-20";

/// `p` field of BSV-20 payloads.
pub const PROTOCOL: &str = "bsv-20";

/// `op` field of transfer payloads.
pub const OP_TRANSFER: &str = "transfer";

/// `op` field of deploy/mint payloads.
pub const OP_DEPLOY_MINT: &str = "deploy+mint";

/// Field order here fixes the JSON key order (alphabetical).
#[derive(Serialize)]
struct TransferPayload<'a> {
    amt: String,
    id: &'a str,
    op: &'static str,
    p: &'static str,
}

/// JSON payload of a transfer inscription:
/// `{"amt":"<n>","id":"<token>","op":"transfer","p":"bsv-20"}`.
pub fn transfer_payload(token_id: &str, amount: u64) -> Vec<u8> {
    let payload = TransferPayload {
        amt: amount.to_string(),
        id: token_id,
        op: OP_TRANSFER,
        p: PROTOCOL,
    };
    // a struct of strings always serializes
    serde_json::to_vec(&payload).unwrap_or_default()
}

/// Cosign lock for `pkh` and `approver`.
pub fn cosign_lock(pkh: &[u8; 20], approver: &PublicKey) -> Script {
    let mut bytes = Vec::with_capacity(25 + 1 + 34);
    bytes.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
    bytes.extend_from_slice(pkh);
    bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIGVERIFY, OP_DATA_33]);
    bytes.extend_from_slice(&approver.to_compressed());
    bytes.push(OP_CHECKSIG);
    Script::from(bytes)
}

/// Ordinals envelope around `payload`, followed by `lock`.
pub fn inscribe(content_type: &str, payload: &[u8], lock: &Script) -> Result<Script, ScriptError> {
    let mut script = Script::new();
    script.append_opcodes(&[OP_FALSE, OP_IF])?;
    script.append_push_data(ORD_MARKER)?;
    script.append_opcodes(&[OP_TRUE])?;
    script.append_push_data(content_type.as_bytes())?;
    script.append_opcodes(&[OP_FALSE])?;
    script.append_push_data(payload)?;
    script.append_opcodes(&[OP_ENDIF])?;

    let mut bytes = script.into_bytes();
    bytes.extend_from_slice(lock.to_bytes());
    Ok(Script::from(bytes))
}

/// Complete output script moving `amount` tokens to `address`.
pub fn transfer_script(
    address: &Address,
    amount: u64,
    config: &TokenConfig,
) -> Result<Script, ScriptError> {
    let lock = cosign_lock(&address.public_key_hash, &config.approver);
    inscribe(CONTENT_TYPE, &transfer_payload(&config.token_id, amount), &lock)
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPROVER: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_transfer_payload_key_order() {
        assert_eq!(
            String::from_utf8(transfer_payload("abc_0", 1500)).unwrap(),
            r#"{"amt":"1500","id":"abc_0","op":"transfer","p":"bsv-20"}"#
        );
    }

    #[test]
    fn test_cosign_lock_asm() {
        let approver = PublicKey::from_hex(APPROVER).unwrap();
        let lock = cosign_lock(&[0x11; 20], &approver);
        assert_eq!(
            lock.to_asm(),
            format!(
                "OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIGVERIFY {} OP_CHECKSIG",
                "11".repeat(20),
                APPROVER
            )
        );
        assert!(!lock.is_p2pkh());
    }

    #[test]
    fn test_inscribed_script_tokenizes_to_fifteen() {
        let approver = PublicKey::from_hex(APPROVER).unwrap();
        let lock = cosign_lock(&[0x22; 20], &approver);
        let payload = transfer_payload("tok", 7);
        let script = inscribe(CONTENT_TYPE, &payload, &lock).unwrap();

        let asm = script.to_asm();
        let tokens: Vec<&str> = asm.split(' ').collect();
        assert_eq!(tokens.len(), 15);
        assert_eq!(&tokens[..6], &[
            "OP_FALSE",
            "OP_IF",
            "6f7264",
            "OP_TRUE",
            "6170706c69636174696f6e2f6273762d3230",
            "OP_FALSE",
        ]);
        assert_eq!(tokens[6], hex::encode(&payload));
        assert_eq!(tokens[7], "OP_ENDIF");
        assert_eq!(tokens[13], APPROVER);
    }

    #[test]
    fn test_long_payload_uses_pushdata1() {
        let approver = PublicKey::from_hex(APPROVER).unwrap();
        let long_id = "f".repeat(64) + "_0";
        let payload = transfer_payload(&long_id, u64::MAX);
        assert!(payload.len() > 75);
        let script =
            inscribe(CONTENT_TYPE, &payload, &cosign_lock(&[0; 20], &approver)).unwrap();
        let asm = script.to_asm();
        assert_eq!(asm.split(' ').nth(6), Some(hex::encode(&payload).as_str()));
    }
}
