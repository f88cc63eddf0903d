//! Unlocking script templates.

pub mod p2pkh;

use mnee_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Produces the unlocking script for one input of a transaction.
///
/// Implementations compute the signature hash themselves, so the input
/// must already carry its source output.
pub trait UnlockingScriptTemplate {
    /// Build the unlocking script for `input_index`.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError>;
}
