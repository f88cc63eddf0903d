#![deny(missing_docs)]

//! MNEE token SDK.
//!
//! Re-exports every MNEE SDK component for single-crate usage.

pub use mnee_client as client;
pub use mnee_primitives as primitives;
pub use mnee_script as script;
pub use mnee_tokens as tokens;
pub use mnee_transaction as transaction;

pub use mnee_client::{ClientConfig, Environment, Mnee};
pub use mnee_tokens::{Classification, MneeError, TransferRecipient};
