use proptest::prelude::*;

use mnee_primitives::ec::PrivateKey;
use mnee_script::Script;
use mnee_transaction::sighash::{signature_hash, SIGHASH_ALL_ANYONECANPAY_FORKID};
use mnee_transaction::template::p2pkh;
use mnee_transaction::template::UnlockingScriptTemplate;
use mnee_transaction::{Transaction, TransactionInput, TransactionOutput};

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_input = (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..64),
        any::<u32>(),
    )
        .prop_map(|(txid, vout, script, seq)| {
            let mut input = TransactionInput::new();
            input.source_txid = txid;
            input.source_tx_out_index = vout;
            input.unlocking_script = if script.is_empty() {
                None
            } else {
                Some(Script::from_bytes(&script))
            };
            input.sequence_number = seq;
            input
        });

    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(sats, script)| TransactionOutput::new(sats, Script::from_bytes(&script)));

    (
        any::<u32>(),
        prop::collection::vec(arb_input, 1..4),
        prop::collection::vec(arb_output, 1..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reparsed_transaction_has_same_txid(tx in arb_transaction()) {
        let back = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        prop_assert_eq!(back.tx_id_hex(), tx.tx_id_hex());
        prop_assert_eq!(back.inputs.len(), tx.inputs.len());
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let _ = Transaction::from_bytes(&bytes);
    }

    #[test]
    fn anyonecanpay_digest_ignores_other_inputs(
        tx in arb_transaction(),
        extra_txid in prop::array::uniform32(any::<u8>()),
    ) {
        let before = signature_hash(&tx, 0, &[], SIGHASH_ALL_ANYONECANPAY_FORKID, 1).unwrap();
        let mut grown = tx.clone();
        let mut extra = TransactionInput::new();
        extra.source_txid = extra_txid;
        grown.add_input(extra);
        let after = signature_hash(&grown, 0, &[], SIGHASH_ALL_ANYONECANPAY_FORKID, 1).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn p2pkh_signature_verifies(sats in 1u64..1_000_000, seed in prop::array::uniform32(any::<u8>())) {
        if let Ok(key) = PrivateKey::from_bytes(&seed) {
            let mut tx = Transaction::new();
            tx.add_input_from(&hex::encode([9u8; 32]), 0, Script::from_bytes(&[0x51]), sats).unwrap();
            tx.add_output(TransactionOutput::new(sats, Script::new()));
            let script = p2pkh::unlock(key.clone(), Some(SIGHASH_ALL_ANYONECANPAY_FORKID))
                .sign(&tx, 0)
                .unwrap();
            let chunks = script.chunks().unwrap();
            let sig = chunks[0].data.clone().unwrap();
            prop_assert_eq!(*sig.last().unwrap() as u32, SIGHASH_ALL_ANYONECANPAY_FORKID);
            let hash = tx.calc_input_signature_hash(0, SIGHASH_ALL_ANYONECANPAY_FORKID).unwrap();
            prop_assert!(key.pub_key().verify(&hash, &key.sign(&hash).unwrap()));
        }
    }
}
