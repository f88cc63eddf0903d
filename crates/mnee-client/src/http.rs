//! HTTP implementation of [`LedgerService`] against the MNEE proxy API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use mnee_tokens::{
    BalanceData, LedgerService, MneeError, SystemConfig, Ticket, TicketLookup,
    TransactionHistoryItem, TransferCallback, TransferRequestBody, TransferResponse, Txo,
};
use mnee_transaction::Transaction;

use crate::config::ClientConfig;

/// Server message for a ticket or transaction the cosigner has not recorded.
pub const RECORD_NOT_FOUND: &str = "record not found";

/// Body of the sync-transfer and tx endpoints.
#[derive(Debug, Deserialize)]
struct RawTxBody {
    #[serde(default)]
    rawtx: Option<String>,
}

/// HTTP client for the MNEE ledger and cosigner.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    /// Client configuration.
    config: ClientConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl HttpLedger {
    /// Create a ledger client; fails only if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, MneeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn client_config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url(), path)
    }

    /// Send `request` with the auth token attached and return the body of a
    /// 200 response.
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String, MneeError> {
        debug!(path, "ledger request");
        let response = request
            .query(&[("auth_token", self.config.auth_token.as_str())])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status == StatusCode::FORBIDDEN {
            warn!(path, "ledger refused the auth token");
            return Err(MneeError::Forbidden);
        }
        if status != StatusCode::OK {
            warn!(path, status = status.as_u16(), "ledger returned an error status");
            return Err(status_error(status, &body));
        }
        Ok(body)
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, MneeError> {
        let body = self.send(request, path).await?;
        serde_json::from_str(&body)
            .map_err(|e| MneeError::LedgerUnavailable(format!("decoding {} response: {}", path, e)))
    }

    /// One page of unspent outputs for `addresses`.
    pub async fn unspent_outputs_paginated(
        &self,
        addresses: &[String],
        page: u32,
        size: u32,
    ) -> Result<Vec<Txo>, MneeError> {
        let path = "/v2/utxos";
        let request = self
            .client
            .post(self.url(path))
            .query(&[("page", page), ("size", size)])
            .json(addresses);
        self.do_request(request, path).await
    }

    /// A single output by `txid_vout` outpoint.
    pub async fn txo(&self, outpoint: &str) -> Result<Txo, MneeError> {
        let path = format!("/v2/txos/{}", outpoint);
        let request = self.client.get(self.url(&path));
        self.do_request(request, &path).await
    }

    /// Balances of `addresses`.
    pub async fn balances(&self, addresses: &[String]) -> Result<Vec<BalanceData>, MneeError> {
        let path = "/v2/balance";
        let request = self.client.post(self.url(path)).json(addresses);
        self.do_request(request, path).await
    }

    /// Transactions touching `addresses`, starting at score `from`.
    pub async fn history(
        &self,
        addresses: &[String],
        from: u64,
        limit: u32,
    ) -> Result<Vec<TransactionHistoryItem>, MneeError> {
        let path = "/v1/sync";
        let request = self
            .client
            .post(self.url(path))
            .query(&[("from", from), ("limit", u64::from(limit))])
            .json(addresses);
        self.do_request(request, path).await
    }

    /// Raw hex of an MNEE transaction.
    pub async fn tx_hex(&self, txid: &str) -> Result<String, MneeError> {
        let path = format!("/v1/tx/{}", txid);
        let request = self.client.get(self.url(&path));
        let body: RawTxBody = self.do_request(request, &path).await?;
        let rawtx = body
            .rawtx
            .ok_or_else(|| MneeError::Server(RECORD_NOT_FOUND.to_string()))?;
        Ok(hex::encode(decode_base64(&rawtx)?))
    }
}

impl LedgerService for HttpLedger {
    async fn config(&self) -> Result<SystemConfig, MneeError> {
        let path = "/v1/config";
        let request = self.client.get(self.url(path));
        self.do_request(request, path).await
    }

    async fn unspent_outputs(&self, addresses: &[String]) -> Result<Vec<Txo>, MneeError> {
        let path = "/v1/utxos";
        let request = self.client.post(self.url(path)).json(addresses);
        self.do_request(request, path).await
    }

    async fn submit_transaction(&self, raw_tx: &[u8]) -> Result<TransferResponse, MneeError> {
        let path = "/v1/transfer";
        let body = TransferRequestBody {
            rawtx: STANDARD.encode(raw_tx),
            callback_url: None,
            callback_secret: None,
        };
        let request = self.client.post(self.url(path)).json(&body);
        let response: RawTxBody = self.do_request(request, path).await?;

        let Some(rawtx) = response.rawtx else {
            return Ok(TransferResponse::default());
        };
        let tx = Transaction::from_bytes(&decode_base64(&rawtx)?)
            .map_err(|e| MneeError::LedgerUnavailable(format!("cosigned transaction: {}", e)))?;
        Ok(TransferResponse {
            txid: Some(tx.tx_id_hex()),
            txhex: Some(tx.to_hex()),
        })
    }

    async fn submit_transaction_async(
        &self,
        raw_tx: &[u8],
        callback: Option<&TransferCallback>,
    ) -> Result<String, MneeError> {
        let path = "/v2/transfer";
        let body = TransferRequestBody {
            rawtx: STANDARD.encode(raw_tx),
            callback_url: callback.and_then(|c| c.url.clone()),
            callback_secret: callback.and_then(|c| c.secret.clone()),
        };
        let request = self.client.post(self.url(path)).json(&body);
        let ticket_id = self.send(request, path).await?;
        if ticket_id.is_empty() {
            return Err(MneeError::EmptyTicket);
        }
        Ok(ticket_id)
    }

    async fn ticket(&self, ticket_id: &str) -> Result<TicketLookup, MneeError> {
        let path = "/v2/ticket";
        let request = self
            .client
            .get(self.url(path))
            .query(&[("ticketID", ticket_id)]);
        match self.do_request::<Ticket>(request, path).await {
            Ok(ticket) => Ok(TicketLookup::Found(ticket)),
            Err(MneeError::Server(message)) if message == RECORD_NOT_FOUND => {
                Ok(TicketLookup::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}

/// Error for a non-200, non-403 response.
fn status_error(status: StatusCode, body: &str) -> MneeError {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(body) {
        Ok(fields) => match fields.get("message").and_then(|m| m.as_str()) {
            Some(message) => MneeError::Server(message.to_string()),
            None => MneeError::Server(format!(
                "status received from mnee-cosigner -> {}",
                status.as_u16()
            )),
        },
        Err(e) => MneeError::LedgerUnavailable(format!(
            "undecodable {} response: {}",
            status.as_u16(),
            e
        )),
    }
}

/// Transport failure; the URL is dropped since it carries the auth token.
fn transport(e: reqwest::Error) -> MneeError {
    MneeError::LedgerUnavailable(e.without_url().to_string())
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, MneeError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| MneeError::LedgerUnavailable(format!("base64 transaction: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        let bad = StatusCode::BAD_REQUEST;
        assert!(matches!(
            status_error(bad, r#"{"message":"bad tx"}"#),
            MneeError::Server(m) if m == "bad tx"
        ));
        assert!(matches!(
            status_error(bad, r#"{"error":"x"}"#),
            MneeError::Server(m) if m == "status received from mnee-cosigner -> 400"
        ));
        assert!(matches!(
            status_error(bad, r#"{"message":5}"#),
            MneeError::Server(m) if m.ends_with("400")
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "<html>"),
            MneeError::LedgerUnavailable(_)
        ));
    }
}
