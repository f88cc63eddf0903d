/// Errors raised while building, parsing or encoding scripts and addresses.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// An ASM token is neither a known opcode nor hex data.
    #[error("invalid opcode data: {0}")]
    InvalidOpcodeData(String),

    /// Push-data opcodes must go through `append_push_data`.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// A push ran past the end of the script.
    #[error("not enough data")]
    DataTooSmall,

    /// The payload is too large for any push opcode.
    #[error("data too big")]
    DataTooBig,

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Base58check checksum does not match.
    #[error("address checksum failed")]
    ChecksumFailed,

    /// Address version byte is neither mainnet (0x00) nor testnet (0x6f) P2PKH.
    #[error("unsupported address version {0:#04x}")]
    UnsupportedVersion(u8),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
