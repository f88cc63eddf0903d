//! Signature hash computation.
//!
//! BSV signs a BIP-143 style digest whenever `SIGHASH_FORKID` is set. MNEE
//! token inputs are signed with `ALL | ANYONECANPAY | FORKID` so the
//! cosigner can attach its own funding input without invalidating ours.

use mnee_primitives::hash::sha256d;
use mnee_primitives::util::WireWriter;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all outputs.
pub const SIGHASH_ALL: u32 = 0x01;
/// Sign no outputs.
pub const SIGHASH_NONE: u32 = 0x02;
/// Sign only the output at the input's index.
pub const SIGHASH_SINGLE: u32 = 0x03;
/// Commit to the signed input only.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;
/// Replay-protection flag required on BSV.
pub const SIGHASH_FORKID: u32 = 0x40;
/// `ALL | FORKID` (0x41).
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;
/// `ALL | ANYONECANPAY | FORKID` (0xC1), used for token inputs.
pub const SIGHASH_ALL_ANYONECANPAY_FORKID: u32 =
    SIGHASH_ALL | SIGHASH_ANYONECANPAY | SIGHASH_FORKID;
/// Mask for the base type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Double-SHA256 of the preimage for `input_index`.
///
/// # Arguments
/// * `tx` - Transaction being signed.
/// * `input_index` - Input to sign.
/// * `prev_output_script` - Locking script of the spent output (scriptCode).
/// * `sighash_type` - Combined flags, e.g. `SIGHASH_ALL_ANYONECANPAY_FORKID`.
/// * `satoshis` - Value of the spent output.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, prev_output_script, sighash_type, satoshis)?;
    Ok(sha256d(&preimage))
}

/// Preimage bytes before hashing:
///
/// 1. nVersion
/// 2. hashPrevouts (zero with ANYONECANPAY)
/// 3. hashSequence (zero with ANYONECANPAY, SINGLE or NONE)
/// 4. outpoint
/// 5. scriptCode
/// 6. value
/// 7. nSequence
/// 8. hashOutputs
/// 9. nLocktime
/// 10. sighash type
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let hash_prevouts = if anyone_can_pay {
        [0u8; 32]
    } else {
        prevouts_hash(tx)
    };

    let hash_sequence =
        if anyone_can_pay || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
            [0u8; 32]
        } else {
            sequence_hash(tx)
        };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = WireWriter::with_capacity(256);
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.source_txid);
    writer.write_u32_le(input.source_tx_out_index);
    writer.write_var_bytes(prev_output_script);
    writer.write_u64_le(satoshis);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_tx_out_index);
    }
    sha256d(writer.as_bytes())
}

fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(writer.as_bytes())
}

/// All outputs, or only the one at `only`.
fn outputs_hash(tx: &Transaction, only: Option<usize>) -> [u8; 32] {
    let mut writer = WireWriter::new();
    match only {
        Some(i) => tx.outputs[i].write_to(&mut writer),
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }
    sha256d(writer.as_bytes())
}
