//! Pay-to-public-key-hash template.
//!
//! Locking: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
//! Unlocking: `<der_sig || sighash_byte> <compressed_pubkey>`, which also
//! satisfies the owner half of a cosign lock.

use mnee_primitives::ec::PrivateKey;
use mnee_script::opcodes::*;
use mnee_script::{Address, Script};

use crate::sighash::SIGHASH_ALL_FORKID;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Standard P2PKH locking script for `address`.
pub fn lock(address: &Address) -> Script {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(&address.public_key_hash);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);
    Script::from(bytes)
}

/// Unlocker for `private_key`; `sighash_flag` defaults to `SIGHASH_ALL_FORKID`.
pub fn unlock(private_key: PrivateKey, sighash_flag: Option<u32>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL_FORKID),
    }
}

/// P2PKH signer holding a key and sighash flag.
#[derive(Debug)]
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2PKH {
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = input_index as usize;
        if idx >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                idx,
                tx.inputs.len()
            )));
        }

        let sig_hash = tx.calc_input_signature_hash(idx, self.sighash_flag)?;
        let signature = self.private_key.sign(&sig_hash)?;

        let mut sig_buf = signature.to_der();
        sig_buf.push(self.sighash_flag as u8);

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&self.private_key.pub_key().to_compressed())?;
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_matches_known_script() {
        let addr = Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr").unwrap();
        assert_eq!(
            lock(&addr).to_hex(),
            "76a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac"
        );
        assert!(lock(&addr).is_p2pkh());
    }

    #[test]
    fn test_sign_without_source_output_fails() {
        let mut tx = Transaction::new();
        tx.add_input(crate::TransactionInput::new());
        let unlocker = unlock(PrivateKey::new(), None);
        assert!(matches!(
            unlocker.sign(&tx, 0),
            Err(TransactionError::SigningError(_))
        ));
        assert!(unlocker.sign(&tx, 1).is_err());
    }
}
