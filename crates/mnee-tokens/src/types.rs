//! Wire types exchanged with the MNEE ledger API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// BSV-21 token data attached to an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bsv21Data {
    /// Token decimals.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dec: u8,
    /// Token amount in atomic units.
    #[serde(default, deserialize_with = "null_as_default")]
    pub amt: u64,
    /// Token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operation that created the output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// Ticker symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sym: Option<String>,
    /// Icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Cosigner data attached to an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosignData {
    /// Owner address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Cosigner public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosigner: Option<String>,
}

/// Token and cosign metadata of an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxoData {
    /// BSV-21 token data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bsv21: Option<Bsv21Data>,
    /// Cosigner data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosign: Option<CosignData>,
}

/// An unspent MNEE output as reported by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Txo {
    /// Satoshis locked in the output (1 for token outputs).
    #[serde(default, deserialize_with = "null_as_default")]
    pub satoshis: u64,
    /// Block height.
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u64,
    /// Index within the block.
    #[serde(default, deserialize_with = "null_as_default")]
    pub idx: u64,
    /// Ordering score.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: u64,
    /// Output index.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vout: u64,
    /// `txid_vout` outpoint string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outpoint: Option<String>,
    /// Base64 locking script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Source txid, display order hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Token metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TxoData>,
    /// Owner addresses; the first one controls the output.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    /// Sender addresses.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub senders: Vec<String>,
}

impl Txo {
    /// Token amount, or 0 when the output carries no token data.
    pub fn token_amount(&self) -> u64 {
        self.data
            .as_ref()
            .and_then(|d| d.bsv21.as_ref())
            .map_or(0, |b| b.amt)
    }

    /// The controlling owner address.
    pub fn owner(&self) -> Option<&str> {
        self.owners.first().map(String::as_str)
    }
}

/// One recipient of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecipient {
    /// Atomic units to send; must be positive.
    pub amount: u64,
    /// Base58check P2PKH address.
    pub address: String,
}

impl TransferRecipient {
    /// Recipient of `amount` at `address`.
    pub fn new(amount: u64, address: impl Into<String>) -> Self {
        TransferRecipient {
            amount,
            address: address.into(),
        }
    }
}

/// Webhook the cosigner calls when an asynchronous transfer settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferCallback {
    /// Callback URL.
    pub url: Option<String>,
    /// Shared secret sent with the callback.
    pub secret: Option<String>,
}

/// Body posted to the transfer endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequestBody {
    /// Base64 raw transaction.
    pub rawtx: String,
    /// Callback URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Callback secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_secret: Option<String>,
}

/// Result of a synchronous transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    /// Txid of the cosigned transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Hex of the cosigned transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txhex: Option<String>,
}

/// Lifecycle state of an asynchronous transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    /// In the mempool.
    Broadcasting,
    /// Accepted by the cosigner.
    Success,
    /// Rejected.
    Failed,
    /// Included in a block.
    Mined,
    /// Any status string not listed above.
    Other(String),
}

impl TicketStatus {
    /// True for states that will not change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Success | TicketStatus::Failed | TicketStatus::Mined)
    }

    /// The wire string.
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Broadcasting => "BROADCASTING",
            TicketStatus::Success => "SUCCESS",
            TicketStatus::Failed => "FAILED",
            TicketStatus::Mined => "MINED",
            TicketStatus::Other(s) => s,
        }
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BROADCASTING" => TicketStatus::Broadcasting,
            "SUCCESS" => TicketStatus::Success,
            "FAILED" => TicketStatus::Failed,
            "MINED" => TicketStatus::Mined,
            _ => TicketStatus::Other(s),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record of an asynchronous transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Txid once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    /// Raw hex once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hex: Option<String>,
    /// Requested action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_requested: Option<String>,
    /// Callback URL registered with the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Callback secret registered with the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_secret: Option<String>,
    /// Current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// RFC 3339 creation time.
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// RFC 3339 last update time.
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Errors reported by the cosigner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

/// MNEE balance of one address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceData {
    /// The address.
    #[serde(default)]
    pub address: Option<String>,
    /// Balance in atomic units.
    #[serde(default, deserialize_with = "null_as_default")]
    pub amt: f64,
    /// Balance scaled by the token decimals.
    #[serde(default, deserialize_with = "null_as_default")]
    pub precised: f64,
}

/// One transaction touching the queried addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHistoryItem {
    /// Block height.
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u64,
    /// Index within the block.
    #[serde(default, deserialize_with = "null_as_default")]
    pub idx: u64,
    /// Ordering score; pass as `from` to continue paging.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: u64,
    /// Base64 raw transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawtx: Option<String>,
    /// Txid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Output indexes belonging to the queried addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub outs: Vec<u64>,
    /// Sender addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub senders: Vec<String>,
    /// Receiver addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub receivers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txo_decodes_ledger_json() {
        let json = r#"{
            "satoshis": 1, "height": 900000, "idx": 3, "score": 9, "vout": 2,
            "outpoint": "abcd_2", "script": "dqkU", "txid": "abcd",
            "data": {"bsv21": {"dec": 5, "amt": 1500, "id": "tok_0", "op": "transfer"},
                     "cosign": {"address": "1A", "cosigner": "02ff"}},
            "owners": ["1A"], "senders": null
        }"#;
        let txo: Txo = serde_json::from_str(json).unwrap();
        assert_eq!(txo.token_amount(), 1500);
        assert_eq!(txo.owner(), Some("1A"));
        assert!(txo.senders.is_empty());
        assert_eq!(txo.vout, 2);
    }

    #[test]
    fn test_txo_missing_fields_default() {
        let txo: Txo = serde_json::from_str("{}").unwrap();
        assert_eq!(txo.token_amount(), 0);
        assert!(txo.owner().is_none());
        assert!(txo.txid.is_none());
    }

    #[test]
    fn test_null_numbers_decode_as_zero() {
        let txo: Txo = serde_json::from_str(
            r#"{"satoshis":null,"height":null,"idx":null,"score":null,"vout":null,
                "data":{"bsv21":{"amt":null,"dec":null}}}"#,
        )
        .unwrap();
        assert_eq!(txo.height, 0);
        assert_eq!(txo.vout, 0);
        assert_eq!(txo.token_amount(), 0);

        let item: TransactionHistoryItem =
            serde_json::from_str(r#"{"height":null,"idx":null,"score":null,"txid":"ab"}"#).unwrap();
        assert_eq!(item.score, 0);
        assert_eq!(item.txid.as_deref(), Some("ab"));

        let balance: BalanceData =
            serde_json::from_str(r#"{"address":"1A","amt":null,"precised":null}"#).unwrap();
        assert_eq!(balance.amt, 0.0);
    }

    #[test]
    fn test_ticket_status_keeps_unknown_strings() {
        let ticket: Ticket =
            serde_json::from_str(r#"{"id":"t1","status":"QUEUED","errors":null}"#).unwrap();
        assert_eq!(ticket.status, Some(TicketStatus::Other("QUEUED".into())));
        assert!(ticket.errors.is_empty());

        let mined: Ticket = serde_json::from_str(
            r#"{"status":"MINED","createdAt":"2025-01-01T00:00:00Z","errors":[]}"#,
        )
        .unwrap();
        assert_eq!(mined.status, Some(TicketStatus::Mined));
        assert!(mined.status.as_ref().is_some_and(TicketStatus::is_terminal));
        assert_eq!(mined.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(
            serde_json::to_value(&TicketStatus::Broadcasting).unwrap(),
            serde_json::json!("BROADCASTING")
        );
    }

    #[test]
    fn test_transfer_request_body_omits_missing_callback() {
        let body = TransferRequestBody {
            rawtx: "AQID".into(),
            callback_url: None,
            callback_secret: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"rawtx":"AQID"}"#);
    }
}
