/// Script handling for the MNEE SDK.
///
/// Provides the `Script` byte container, the opcode table with ASM
/// mnemonics, chunk decoding and base58check P2PKH addresses.

pub mod address;
pub mod chunk;
pub mod opcodes;
pub mod script;

mod error;
pub use address::{Address, Network};
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
