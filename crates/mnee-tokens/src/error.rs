//! Error taxonomy shared by every MNEE operation.

use mnee_primitives::PrimitivesError;
use mnee_script::ScriptError;
use mnee_transaction::TransactionError;

/// Errors returned by MNEE operations.
///
/// Every error reaches the immediate caller unchanged; none are retried
/// except `NotFound` ticket lookups inside the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum MneeError {
    /// The token configuration is missing a required field or holds an
    /// unparsable value. Not retryable.
    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    /// A transfer amount is zero, or amounts overflow when summed.
    #[error("transfer amount must be greater than 0")]
    InvalidAmount,

    /// The controlled outputs cannot cover the transfer (plus fee).
    #[error("insufficient mnee balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Atomic units needed.
        required: u64,
        /// Atomic units found across usable outputs.
        available: u64,
    },

    /// The ledger answered 403, almost always a bad auth token.
    #[error("forbidden access to cosigner")]
    Forbidden,

    /// Transport failure or an undecodable response.
    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// The ledger rejected the request with a message.
    #[error("{0}")]
    Server(String),

    /// An asynchronous submission returned 200 with an empty ticket id.
    #[error("received an empty ticket ID from server")]
    EmptyTicket,

    /// The caller's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,

    /// Environment name is neither `MAIN` nor `SANDBOX`.
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    /// A signing key could not be decoded.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A recipient, owner or fee address could not be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A transaction or an input of one could not be decoded.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Primitives error.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),

    /// Script error.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Transaction error.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
