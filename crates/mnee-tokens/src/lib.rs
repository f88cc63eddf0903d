#![deny(missing_docs)]
//! MNEE token transfers.
//!
//! Token configuration, the inscription and cosign-lock script builders,
//! coin selection with tiered fees, transfer assembly and signing, and the
//! validator that recognizes MNEE output scripts. Network access is
//! abstracted behind [`LedgerService`].

pub mod assembler;
pub mod config;
pub mod error;
pub mod inscription;
pub mod ledger;
pub mod selector;
pub mod types;
pub mod validator;

pub use assembler::{
    validate_amounts, AssembledTransfer, CandidateSource, SigningKeys, SigningMode,
    TransactionAssembler,
};
pub use config::{FeeTier, SystemConfig, TokenConfig};
pub use error::MneeError;
pub use ledger::{LedgerService, TicketLookup};
pub use selector::{ChangeOutput, CoinSelector, FeeOutput, SelectionResult};
pub use types::{
    BalanceData, Ticket, TicketStatus, TransactionHistoryItem, TransferCallback,
    TransferRecipient, TransferRequestBody, TransferResponse, Txo,
};
pub use validator::{
    Classification, DeployInscription, ScriptValidator, TokenMetadata, TransferInscription,
};
