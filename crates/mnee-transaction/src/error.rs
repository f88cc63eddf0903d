/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Structural problem, such as an input index out of range.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// Signing failed, typically because an input lacks its source output.
    #[error("signing error: {0}")]
    SigningError(String),
    /// Wire decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// Forwarded from `mnee-script`.
    #[error("script error: {0}")]
    Script(#[from] mnee_script::ScriptError),
    /// Forwarded from `mnee-primitives`.
    #[error("primitives error: {0}")]
    Primitives(#[from] mnee_primitives::PrimitivesError),
}
