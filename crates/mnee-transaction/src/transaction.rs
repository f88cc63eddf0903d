//! Core transaction type.
//!
//! Version, inputs, outputs and lock time, with wire (de)serialization,
//! txid computation and per-input signature hashing.

use mnee_primitives::hash::sha256d;
use mnee_primitives::util::{VarInt, WireReader, WireWriter};
use mnee_script::Script;

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TransactionOutput;
use crate::sighash;
use crate::TransactionError;

/// A BSV transaction.
///
/// # Wire format
///
/// | Field        | Size                 |
/// |--------------|----------------------|
/// | version      | 4 bytes (LE)         |
/// | input count  | VarInt               |
/// | inputs       | variable (per input) |
/// | output count | VarInt               |
/// | outputs      | variable (per output)|
/// | lock_time    | 4 bytes (LE)         |
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Format version.
    pub version: u32,
    /// Ordered inputs.
    pub inputs: Vec<TransactionInput>,
    /// Ordered outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Lock time.
    pub lock_time: u32,
}

impl Transaction {
    /// Empty version 1 transaction with lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Parse a hex-encoded raw transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse exactly one transaction from `bytes`; trailing data is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Decode a transaction from a reader positioned at its first byte.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;
        // each input is at least 41 bytes, so never preallocate beyond what remains
        let mut inputs =
            Vec::with_capacity((input_count.value() as usize).min(reader.remaining() / 41));
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;
        let mut outputs =
            Vec::with_capacity((output_count.value() as usize).min(reader.remaining() / 9));
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        writer.write_u32_le(self.version);
        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }
        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }
        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Wire bytes as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// sha256d of the wire bytes, internal byte order.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// Txid in display (byte reversed) order.
    pub fn tx_id_hex(&self) -> String {
        let mut id = self.tx_id();
        id.reverse();
        hex::encode(id)
    }

    /// Append an input.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an output.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Number of inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Spend `vout` of `prev_tx_id`, remembering the spent output for signing.
    ///
    /// # Arguments
    /// * `prev_tx_id` - Source txid in display order (64 hex chars).
    /// * `vout` - Output index being spent.
    /// * `locking_script` - Locking script of the spent output.
    /// * `satoshis` - Value of the spent output.
    pub fn add_input_from(
        &mut self,
        prev_tx_id: &str,
        vout: u32,
        locking_script: Script,
        satoshis: u64,
    ) -> Result<(), TransactionError> {
        let decoded = hex::decode(prev_tx_id).map_err(|e| {
            TransactionError::InvalidTransaction(format!("txid {}: {}", prev_tx_id, e))
        })?;
        let mut source_txid: [u8; 32] = decoded.try_into().map_err(|_| {
            TransactionError::InvalidTransaction(format!(
                "txid {} is not 32 bytes",
                prev_tx_id
            ))
        })?;
        source_txid.reverse();

        let mut input = TransactionInput::new();
        input.source_txid = source_txid;
        input.source_tx_out_index = vout;
        input.sequence_number = DEFAULT_SEQUENCE_NUMBER;
        input.set_source_output(Some(TransactionOutput::new(satoshis, locking_script)));
        self.inputs.push(input);
        Ok(())
    }

    /// Signature hash for `input_index` using its attached source output.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        sighash_flag: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                self.inputs.len()
            ))
        })?;
        let source = input.source_tx_output().ok_or_else(|| {
            TransactionError::SigningError(format!(
                "input {} has no source output attached",
                input_index
            ))
        })?;

        sighash::signature_hash(
            self,
            input_index,
            source.locking_script.to_bytes(),
            sighash_flag,
            source.satoshis,
        )
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
