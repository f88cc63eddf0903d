//! The ledger service the SDK talks to.

use crate::config::SystemConfig;
use crate::types::{Ticket, TransferCallback, TransferResponse, Txo};
use crate::MneeError;

/// Result of a ticket lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketLookup {
    /// The ticket exists.
    Found(Ticket),
    /// The cosigner has not recorded the ticket yet.
    NotFound,
}

/// Remote MNEE ledger and cosigner.
pub trait LedgerService: Send + Sync {
    /// Current system configuration.
    fn config(&self) -> impl std::future::Future<Output = Result<SystemConfig, MneeError>> + Send;

    /// Unspent token outputs owned by `addresses`.
    fn unspent_outputs(
        &self,
        addresses: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Txo>, MneeError>> + Send;

    /// Submit a raw transaction and wait for the cosigned result.
    fn submit_transaction(
        &self,
        raw_tx: &[u8],
    ) -> impl std::future::Future<Output = Result<TransferResponse, MneeError>> + Send;

    /// Submit a raw transaction for asynchronous cosigning; returns the
    /// ticket id.
    fn submit_transaction_async(
        &self,
        raw_tx: &[u8],
        callback: Option<&TransferCallback>,
    ) -> impl std::future::Future<Output = Result<String, MneeError>> + Send;

    /// Look up an asynchronous submission.
    fn ticket(
        &self,
        ticket_id: &str,
    ) -> impl std::future::Future<Output = Result<TicketLookup, MneeError>> + Send;
}
