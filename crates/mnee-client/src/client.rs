//! The [`Mnee`] facade.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use mnee_tokens::{
    validate_amounts, AssembledTransfer, BalanceData, CandidateSource, Classification,
    LedgerService, MneeError, ScriptValidator, SigningKeys, SigningMode, SystemConfig, Ticket,
    TicketLookup, TokenConfig, TransactionAssembler, TransactionHistoryItem, TransferCallback,
    TransferRecipient, TransferResponse, Txo,
};

use crate::cache::ConfigCache;
use crate::config::ClientConfig;
use crate::http::HttpLedger;

/// MNEE SDK entry point.
///
/// Every network-bound method takes a [`CancellationToken`]; when it fires
/// the pending request is dropped and the call returns
/// [`MneeError::Cancelled`].
#[derive(Debug)]
pub struct Mnee<L = HttpLedger> {
    ledger: L,
    cache: ConfigCache,
}

impl Mnee<HttpLedger> {
    /// Client for the environment and token in `config`.
    pub fn new(config: ClientConfig) -> Result<Self, MneeError> {
        let ttl = config.config_ttl;
        Ok(Mnee::with_ledger(HttpLedger::new(config)?, ttl))
    }

    /// Unspent outputs of `addresses`, one page at a time.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn unspent_txos_paginated(
        &self,
        addresses: &[String],
        page: u32,
        size: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Txo>, MneeError> {
        cancellable(cancel, self.ledger.unspent_outputs_paginated(addresses, page, size)).await
    }

    /// A single output by outpoint.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn txo(&self, outpoint: &str, cancel: &CancellationToken) -> Result<Txo, MneeError> {
        cancellable(cancel, self.ledger.txo(outpoint)).await
    }

    /// Balances of `addresses`.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn balances(
        &self,
        addresses: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<BalanceData>, MneeError> {
        cancellable(cancel, self.ledger.balances(addresses)).await
    }

    /// Transaction history of `addresses` from score `from`.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn history(
        &self,
        addresses: &[String],
        from: u64,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionHistoryItem>, MneeError> {
        cancellable(cancel, self.ledger.history(addresses, from, limit)).await
    }

    /// Raw hex of an MNEE transaction.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn tx_hex(&self, txid: &str, cancel: &CancellationToken) -> Result<String, MneeError> {
        cancellable(cancel, self.ledger.tx_hex(txid)).await
    }
}

impl<L: LedgerService> Mnee<L> {
    /// Facade over any ledger implementation.
    pub fn with_ledger(ledger: L, config_ttl: Duration) -> Self {
        Mnee {
            ledger,
            cache: ConfigCache::new(config_ttl),
        }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// System configuration, from the cache while it is fresh.
    #[instrument(skip_all, level = "debug")]
    pub async fn config(&self, cancel: &CancellationToken) -> Result<SystemConfig, MneeError> {
        cancellable(cancel, self.cache.get(&self.ledger, false)).await
    }

    /// System configuration, always fetched.
    #[instrument(skip_all, level = "debug")]
    pub async fn refresh_config(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SystemConfig, MneeError> {
        cancellable(cancel, self.cache.get(&self.ledger, true)).await
    }

    /// Drop the cached configuration so the next read fetches it again.
    #[instrument(skip_all, level = "debug")]
    pub async fn invalidate_config(&self) {
        self.cache.invalidate().await;
    }

    /// Build, sign and synchronously submit a transfer.
    ///
    /// `txos: Some(..)` spends exactly those outputs; `None` fetches the
    /// unspent outputs of the signing addresses.
    #[instrument(skip(self, wifs, txos, cancel), level = "debug")]
    pub async fn transfer<S: AsRef<str>>(
        &self,
        wifs: &[S],
        recipients: &[TransferRecipient],
        txos: Option<Vec<Txo>>,
        cancel: &CancellationToken,
    ) -> Result<TransferResponse, MneeError> {
        let transfer = self
            .assemble(wifs, recipients, txos.into(), SigningMode::SignAll, cancel)
            .await?;
        match self.dispatch(&transfer, Delivery::Sync, cancel).await? {
            Dispatched::Cosigned(response) => Ok(response),
            other => Err(unexpected(other)),
        }
    }

    /// Build, sign and asynchronously submit a transfer; returns the ticket id.
    #[instrument(skip(self, wifs, txos, callback, cancel), level = "debug")]
    pub async fn transfer_async<S: AsRef<str>>(
        &self,
        wifs: &[S],
        recipients: &[TransferRecipient],
        txos: Option<Vec<Txo>>,
        callback: Option<&TransferCallback>,
        cancel: &CancellationToken,
    ) -> Result<String, MneeError> {
        let transfer = self
            .assemble(wifs, recipients, txos.into(), SigningMode::SignAll, cancel)
            .await?;
        match self.dispatch(&transfer, Delivery::Async(callback), cancel).await? {
            Dispatched::Ticket(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Build and sign a transfer without submitting it; returns the raw hex.
    #[instrument(skip(self, wifs, txos, cancel), level = "debug")]
    pub async fn partial_sign<S: AsRef<str>>(
        &self,
        wifs: &[S],
        recipients: &[TransferRecipient],
        txos: Option<Vec<Txo>>,
        cancel: &CancellationToken,
    ) -> Result<String, MneeError> {
        let transfer = self
            .assemble(wifs, recipients, txos.into(), SigningMode::SignOwnedOnly, cancel)
            .await?;
        match self.dispatch(&transfer, Delivery::Sync, cancel).await? {
            Dispatched::Unsubmitted(hex) => Ok(hex),
            other => Err(unexpected(other)),
        }
    }

    /// Submit a prebuilt transaction for synchronous cosigning.
    #[instrument(skip_all, level = "debug")]
    pub async fn submit_raw_tx(
        &self,
        raw_tx_hex: &str,
        cancel: &CancellationToken,
    ) -> Result<TransferResponse, MneeError> {
        let raw = decode_raw_tx(raw_tx_hex)?;
        cancellable(cancel, self.ledger.submit_transaction(&raw)).await
    }

    /// Submit a prebuilt transaction for asynchronous cosigning; returns the
    /// ticket id.
    #[instrument(skip_all, level = "debug")]
    pub async fn submit_raw_tx_async(
        &self,
        raw_tx_hex: &str,
        callback: Option<&TransferCallback>,
        cancel: &CancellationToken,
    ) -> Result<String, MneeError> {
        let raw = decode_raw_tx(raw_tx_hex)?;
        cancellable(cancel, self.ledger.submit_transaction_async(&raw, callback)).await
    }

    /// Poll a ticket every `interval` until the cosigner has a record of it.
    ///
    /// Only a not-yet-recorded ticket is retried; any other error ends the
    /// loop.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn poll_ticket(
        &self,
        ticket_id: &str,
        interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<Ticket, MneeError> {
        loop {
            match cancellable(cancel, self.ledger.ticket(ticket_id)).await? {
                TicketLookup::Found(ticket) => return Ok(ticket),
                TicketLookup::NotFound => {
                    debug!(ticket_id, "ticket not recorded yet");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(MneeError::Cancelled),
                        _ = tokio::time::sleep(interval) => {}
                    }
                }
            }
        }
    }

    /// True if `asm` is a valid MNEE output script under the current config.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn is_mnee_script(
        &self,
        asm: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, MneeError> {
        Ok(self.classify_script(asm, cancel).await?.is_token())
    }

    /// Classify `asm` under the current config.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn classify_script(
        &self,
        asm: &str,
        cancel: &CancellationToken,
    ) -> Result<Classification, MneeError> {
        let config = self.config(cancel).await?;
        Ok(ScriptValidator::new(&config).classify_asm(asm))
    }

    /// Unspent outputs of `addresses`.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn unspent_txos(
        &self,
        addresses: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Txo>, MneeError> {
        cancellable(cancel, self.ledger.unspent_outputs(addresses)).await
    }

    /// Validate config and amounts, gather candidates, then build.
    async fn assemble<S: AsRef<str>>(
        &self,
        wifs: &[S],
        recipients: &[TransferRecipient],
        source: CandidateSource,
        mode: SigningMode,
        cancel: &CancellationToken,
    ) -> Result<AssembledTransfer, MneeError> {
        let raw = self.config(cancel).await?;
        let config = TokenConfig::try_from(&raw)?;
        validate_amounts(recipients)?;
        let keys = SigningKeys::from_wifs(wifs)?;

        let candidates = match source {
            CandidateSource::Provided(txos) => txos,
            CandidateSource::Ledger => {
                cancellable(cancel, self.ledger.unspent_outputs(keys.addresses())).await?
            }
        };
        debug!(candidates = candidates.len(), ?mode, "assembling transfer");

        TransactionAssembler::new(&config).build(recipients, &keys, &candidates, mode)
    }

    /// Hand an assembled transfer to the cosigner according to its mode.
    ///
    /// A `SignOwnedOnly` transfer is never submitted, whatever `delivery`
    /// asks for; its hex comes back unchanged.
    pub(crate) async fn dispatch(
        &self,
        transfer: &AssembledTransfer,
        delivery: Delivery<'_>,
        cancel: &CancellationToken,
    ) -> Result<Dispatched, MneeError> {
        match transfer.mode {
            SigningMode::SignOwnedOnly => {
                debug!(txid = %transfer.txid(), "returning partially signed transfer");
                Ok(Dispatched::Unsubmitted(transfer.to_hex()))
            }
            SigningMode::SignAll => {
                let raw = transfer.to_bytes();
                match delivery {
                    Delivery::Sync => cancellable(cancel, self.ledger.submit_transaction(&raw))
                        .await
                        .map(Dispatched::Cosigned),
                    Delivery::Async(callback) => cancellable(
                        cancel,
                        self.ledger.submit_transaction_async(&raw, callback),
                    )
                    .await
                    .map(Dispatched::Ticket),
                }
            }
        }
    }
}

/// How a fully signed transfer reaches the cosigner.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Delivery<'a> {
    /// Wait for the cosigned transaction.
    Sync,
    /// Queue it and take a ticket.
    Async(Option<&'a TransferCallback>),
}

/// What [`Mnee::dispatch`] did with a transfer.
#[derive(Debug)]
pub(crate) enum Dispatched {
    Cosigned(TransferResponse),
    Ticket(String),
    Unsubmitted(String),
}

fn unexpected(outcome: Dispatched) -> MneeError {
    MneeError::InvalidTransaction(format!("unexpected dispatch outcome: {:?}", outcome))
}

/// Race `fut` against `cancel`.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, MneeError>
where
    F: Future<Output = Result<T, MneeError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MneeError::Cancelled),
        res = fut => res,
    }
}

fn decode_raw_tx(raw_tx_hex: &str) -> Result<Vec<u8>, MneeError> {
    hex::decode(raw_tx_hex)
        .map_err(|e| MneeError::InvalidTransaction(format!("invalid raw transaction hex: {}", e)))
}
