/// Transaction building, signing and serialization for the MNEE SDK.
///
/// Provides the `Transaction` wire codec, BIP-143 style FORKID signature
/// hashing and the P2PKH unlocking template used to authorize token inputs.

pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod transaction;

mod error;
pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use transaction::Transaction;
