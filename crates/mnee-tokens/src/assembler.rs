//! Builds and signs MNEE transfer transactions.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use mnee_primitives::ec::PrivateKey;
use mnee_script::{Address, Script};
use mnee_transaction::sighash::SIGHASH_ALL_ANYONECANPAY_FORKID;
use mnee_transaction::template::p2pkh;
use mnee_transaction::template::UnlockingScriptTemplate;
use mnee_transaction::{Transaction, TransactionOutput};

use crate::config::TokenConfig;
use crate::inscription::transfer_script;
use crate::selector::{CoinSelector, SelectionResult};
use crate::types::{TransferRecipient, Txo};
use crate::MneeError;

/// Satoshis carried by every token output.
const TOKEN_OUTPUT_SATOSHIS: u64 = 1;

/// What happens to an assembled transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// Sign every input and hand the result to the cosigner.
    SignAll,
    /// Sign the caller's inputs and return the transaction for someone else
    /// to complete.
    SignOwnedOnly,
}

/// Where transfer inputs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Use exactly these outputs, in this order.
    Provided(Vec<Txo>),
    /// Fetch the unspent outputs of the signing addresses.
    Ledger,
}

impl From<Option<Vec<Txo>>> for CandidateSource {
    fn from(txos: Option<Vec<Txo>>) -> Self {
        match txos {
            Some(txos) => CandidateSource::Provided(txos),
            None => CandidateSource::Ledger,
        }
    }
}

/// Signing keys indexed by their mainnet P2PKH address.
#[derive(Debug, Clone, Default)]
pub struct SigningKeys {
    addresses: Vec<String>,
    keys: HashMap<String, PrivateKey>,
}

impl SigningKeys {
    /// Parse WIF keys. Duplicate keys collapse to one address.
    pub fn from_wifs<S: AsRef<str>>(wifs: &[S]) -> Result<Self, MneeError> {
        let mut keys = Vec::with_capacity(wifs.len());
        for wif in wifs {
            let key = PrivateKey::from_wif(wif.as_ref())
                .map_err(|e| MneeError::InvalidKey(e.to_string()))?;
            keys.push(key);
        }
        Ok(Self::from_keys(keys))
    }

    /// Index already-parsed keys.
    pub fn from_keys(keys: impl IntoIterator<Item = PrivateKey>) -> Self {
        let mut out = SigningKeys::default();
        for key in keys {
            let address = Address::from_public_key(&key.pub_key(), true).address_string;
            if !out.keys.contains_key(&address) {
                out.addresses.push(address.clone());
                out.keys.insert(address, key);
            }
        }
        out
    }

    /// Controlled addresses, in key order.
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Key controlling `address`.
    pub fn key_for(&self, address: &str) -> Option<&PrivateKey> {
        self.keys.get(address)
    }

    /// True if no keys were given.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Sum of recipient amounts; every amount must be positive.
pub fn validate_amounts(recipients: &[TransferRecipient]) -> Result<u64, MneeError> {
    if recipients.is_empty() {
        return Err(MneeError::InvalidAmount);
    }
    recipients.iter().try_fold(0u64, |acc, r| {
        if r.amount == 0 {
            return Err(MneeError::InvalidAmount);
        }
        acc.checked_add(r.amount).ok_or(MneeError::InvalidAmount)
    })
}

/// A signed transfer and the selection that funded it.
#[derive(Debug, Clone)]
pub struct AssembledTransfer {
    /// The signed transaction.
    pub transaction: Transaction,
    /// Inputs, fee and change chosen by the selector.
    pub selection: SelectionResult,
    /// Mode the transfer was built for.
    pub mode: SigningMode,
}

impl AssembledTransfer {
    /// Raw transaction hex.
    pub fn to_hex(&self) -> String {
        self.transaction.to_hex()
    }

    /// Raw transaction bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.transaction.to_bytes()
    }

    /// Txid in display order.
    pub fn txid(&self) -> String {
        self.transaction.tx_id_hex()
    }
}

/// Builds transfers against one validated token configuration.
#[derive(Debug, Clone, Copy)]
pub struct TransactionAssembler<'a> {
    config: &'a TokenConfig,
}

impl<'a> TransactionAssembler<'a> {
    /// Assembler for `config`.
    pub fn new(config: &'a TokenConfig) -> Self {
        TransactionAssembler { config }
    }

    /// Build and sign a transfer.
    ///
    /// Outputs are ordered recipients, fee, change. Every input spends a
    /// selected candidate and is signed with `FORKID | ALL | ANYONECANPAY`
    /// so the cosigner can complete the transaction without invalidating it.
    ///
    /// # Arguments
    /// * `recipients` - Requested transfer; amounts must be positive.
    /// * `keys` - Keys for the addresses whose outputs may be spent.
    /// * `candidates` - Outputs to select from, in preference order.
    /// * `mode` - Recorded on the result for the submitter.
    pub fn build(
        &self,
        recipients: &[TransferRecipient],
        keys: &SigningKeys,
        candidates: &[Txo],
        mode: SigningMode,
    ) -> Result<AssembledTransfer, MneeError> {
        let required = validate_amounts(recipients)?;

        let mut tx = Transaction::new();
        for recipient in recipients {
            tx.add_output(self.token_output(&recipient.address, recipient.amount)?);
        }

        let selector = CoinSelector::new(
            &self.config.fee_tiers,
            &self.config.fee_address.address_string,
        );
        let selection = selector.select(candidates, required, keys.addresses(), recipients)?;

        if let Some(fee) = &selection.fee {
            tx.add_output(self.token_output(&fee.address, fee.amount)?);
        }
        if let Some(change) = &selection.change {
            tx.add_output(self.token_output(&change.address, change.amount)?);
        }
        debug!(
            outputs = tx.output_count(),
            inputs = selection.selected.len(),
            "assembled transfer outputs"
        );

        let mut signers = Vec::with_capacity(selection.selected.len());
        for txo in &selection.selected {
            let (txid, vout, script, owner) = spend_details(txo)?;
            let key = keys.key_for(owner).ok_or_else(|| {
                MneeError::InvalidKey(format!("no key for input owner {}", owner))
            })?;
            tx.add_input_from(txid, vout, script, txo.satoshis)?;
            signers.push(p2pkh::unlock(key.clone(), Some(SIGHASH_ALL_ANYONECANPAY_FORKID)));
        }

        for (index, signer) in signers.iter().enumerate() {
            let unlocking = signer.sign(&tx, index as u32)?;
            tx.inputs[index].unlocking_script = Some(unlocking);
        }

        Ok(AssembledTransfer {
            transaction: tx,
            selection,
            mode,
        })
    }

    fn token_output(&self, address: &str, amount: u64) -> Result<TransactionOutput, MneeError> {
        let address = Address::from_string(address)
            .map_err(|e| MneeError::InvalidAddress(format!("{}: {}", address, e)))?;
        let script = transfer_script(&address, amount, self.config)?;
        Ok(TransactionOutput::new(TOKEN_OUTPUT_SATOSHIS, script))
    }
}

/// Txid, vout, decoded locking script and owner of a selected output.
fn spend_details(txo: &Txo) -> Result<(&str, u32, Script, &str), MneeError> {
    let missing = |what: &str| MneeError::InvalidTransaction(format!("selected output has no {}", what));
    let txid = txo.txid.as_deref().ok_or_else(|| missing("txid"))?;
    let owner = txo.owner().ok_or_else(|| missing("owner"))?;
    let encoded = txo.script.as_deref().ok_or_else(|| missing("script"))?;
    let script = STANDARD
        .decode(encoded)
        .map_err(|e| MneeError::InvalidTransaction(format!("script of {}: {}", txid, e)))?;
    let vout = u32::try_from(txo.vout)
        .map_err(|_| MneeError::InvalidTransaction(format!("vout {} out of range", txo.vout)))?;
    Ok((txid, vout, Script::from(script), owner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeeTier;
    use crate::types::{Bsv21Data, TxoData};
    use crate::validator::{Classification, ScriptValidator};
    use crate::SystemConfig;

    const APPROVER: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const FEE: &str = "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr";
    const B: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";

    fn system_config() -> SystemConfig {
        SystemConfig {
            decimals: 5,
            approver: Some(APPROVER.into()),
            fee_address: Some(FEE.into()),
            token_id: Some("tok_0".into()),
            fees: Some(vec![
                FeeTier { min: 0, max: 999, fee: 0 },
                FeeTier { min: 1000, max: 10000, fee: 10 },
            ]),
            ..Default::default()
        }
    }

    fn key() -> PrivateKey {
        PrivateKey::from_hex(&"01".repeat(32)).unwrap()
    }

    fn owned_txo(keys: &SigningKeys, amt: u64, vout: u64) -> Txo {
        let owner = keys.addresses()[0].clone();
        let address = Address::from_string(&owner).unwrap();
        let cfg = TokenConfig::try_from(system_config()).unwrap();
        let script = transfer_script(&address, amt, &cfg).unwrap();
        Txo {
            satoshis: 1,
            vout,
            txid: Some("ab".repeat(32)),
            script: Some(STANDARD.encode(script.to_bytes())),
            data: Some(TxoData {
                bsv21: Some(Bsv21Data { amt, ..Default::default() }),
                cosign: None,
            }),
            owners: vec![owner],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_amounts() {
        assert_eq!(
            validate_amounts(&[TransferRecipient::new(2, B), TransferRecipient::new(3, B)]).unwrap(),
            5
        );
        assert!(matches!(
            validate_amounts(&[TransferRecipient::new(2, B), TransferRecipient::new(0, B)]),
            Err(MneeError::InvalidAmount)
        ));
        assert!(matches!(validate_amounts(&[]), Err(MneeError::InvalidAmount)));
        assert!(matches!(
            validate_amounts(&[TransferRecipient::new(u64::MAX, B), TransferRecipient::new(1, B)]),
            Err(MneeError::InvalidAmount)
        ));
    }

    #[test]
    fn test_signing_keys_from_wifs() {
        let wif = key().to_wif();
        let keys = SigningKeys::from_wifs(&[wif.clone(), wif]).unwrap();
        assert_eq!(keys.addresses().len(), 1);
        assert!(keys.key_for(&keys.addresses()[0]).is_some());
        assert!(matches!(
            SigningKeys::from_wifs(&["not-a-wif"]),
            Err(MneeError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_build_orders_outputs_and_signs_inputs() {
        let cfg = TokenConfig::try_from(system_config()).unwrap();
        let keys = SigningKeys::from_keys([key()]);
        let candidates = [owned_txo(&keys, 600, 0), owned_txo(&keys, 600, 1)];

        let transfer = TransactionAssembler::new(&cfg)
            .build(&[TransferRecipient::new(1000, B)], &keys, &candidates, SigningMode::SignAll)
            .unwrap();
        let tx = &transfer.transaction;

        assert_eq!(tx.input_count(), 2);
        assert_eq!(tx.output_count(), 3);
        assert!(tx.outputs.iter().all(|o| o.satoshis == 1));
        assert_eq!(transfer.selection.fee.as_ref().map(|f| f.amount), Some(10));
        assert_eq!(transfer.selection.change.as_ref().map(|c| c.amount), Some(190));
        assert_eq!(transfer.mode, SigningMode::SignAll);

        for (i, input) in tx.inputs.iter().enumerate() {
            assert_eq!(input.sequence_number, 0xffff_ffff);
            let chunks = input.unlocking_script.as_ref().unwrap().chunks().unwrap();
            assert_eq!(chunks.len(), 2);
            let sig = chunks[0].data.as_ref().unwrap();
            assert_eq!(*sig.last().unwrap(), 0xC1);
            assert_eq!(input.source_tx_out_index, i as u32);
        }

        let reparsed = Transaction::from_hex(&transfer.to_hex()).unwrap();
        assert_eq!(reparsed.tx_id_hex(), transfer.txid());
    }

    #[test]
    fn test_built_outputs_classify_as_transfers() {
        let raw = system_config();
        let cfg = TokenConfig::try_from(&raw).unwrap();
        let keys = SigningKeys::from_keys([key()]);
        let transfer = TransactionAssembler::new(&cfg)
            .build(
                &[TransferRecipient::new(1000, B)],
                &keys,
                &[owned_txo(&keys, 1010, 0)],
                SigningMode::SignOwnedOnly,
            )
            .unwrap();

        let validator = ScriptValidator::new(&raw);
        let amounts: Vec<String> = transfer
            .transaction
            .outputs
            .iter()
            .map(|o| match validator.classify_script(&o.locking_script) {
                Classification::Transfer(t) => t.amt,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(amounts, ["1000", "10"]);
    }

    #[test]
    fn test_bad_recipient_address() {
        let cfg = TokenConfig::try_from(system_config()).unwrap();
        let keys = SigningKeys::from_keys([key()]);
        let err = TransactionAssembler::new(&cfg)
            .build(
                &[TransferRecipient::new(5, "nope")],
                &keys,
                &[owned_txo(&keys, 10, 0)],
                SigningMode::SignAll,
            )
            .unwrap_err();
        assert!(matches!(err, MneeError::InvalidAddress(_)));
    }

    #[test]
    fn test_undecodable_candidate_script() {
        let cfg = TokenConfig::try_from(system_config()).unwrap();
        let keys = SigningKeys::from_keys([key()]);
        let mut txo = owned_txo(&keys, 10, 0);
        txo.script = Some("***".into());
        let err = TransactionAssembler::new(&cfg)
            .build(&[TransferRecipient::new(5, B)], &keys, &[txo], SigningMode::SignAll)
            .unwrap_err();
        assert!(matches!(err, MneeError::InvalidTransaction(_)));
    }

    #[test]
    fn test_candidate_source_from_option() {
        assert_eq!(CandidateSource::from(None), CandidateSource::Ledger);
        assert_eq!(
            CandidateSource::from(Some(vec![])),
            CandidateSource::Provided(vec![])
        );
    }
}
