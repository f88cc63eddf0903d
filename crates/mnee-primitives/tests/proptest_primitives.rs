use proptest::prelude::*;

use mnee_primitives::ec::PrivateKey;
use mnee_primitives::hash::sha256;
use mnee_primitives::util::{VarInt, WireReader, WireWriter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wif_roundtrip_preserves_key(seed in prop::array::uniform32(any::<u8>())) {
        // not every 32-byte array is a valid scalar
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let back = PrivateKey::from_wif(&pk.to_wif()).unwrap();
            prop_assert_eq!(pk.to_hex(), back.to_hex());
        }
    }

    #[test]
    fn sign_verify_with_der_length_bounds(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let hash = sha256(&msg);
            let sig = pk.sign(&hash).unwrap();
            prop_assert!(pk.pub_key().verify(&hash, &sig));
            let der = sig.to_der();
            prop_assert!(der.len() >= 8 && der.len() <= 72);
        }
    }

    #[test]
    fn varint_reads_back(value in any::<u64>()) {
        let mut w = WireWriter::new();
        w.write_varint(VarInt(value));
        let bytes = w.into_bytes();
        prop_assert_eq!(bytes.len(), VarInt(value).length());
        let mut r = WireReader::new(&bytes);
        prop_assert_eq!(r.read_varint().unwrap().value(), value);
    }
}
