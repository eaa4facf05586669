use proptest::prelude::*;

use kas_primitives::chainhash::Hash;
use kas_primitives::ec::private_key::PrivateKey;
use kas_primitives::ec::public_key::PublicKey;
use kas_primitives::hash::{DomainHasher, TRANSACTION_HASH_DOMAIN, TRANSACTION_ID_DOMAIN};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn schnorr_sign_verify_roundtrip(
        seed in prop::array::uniform32(any::<u8>()),
        digest in prop::array::uniform32(any::<u8>())
    ) {
        // Not all 32-byte arrays are valid private keys (must be < curve order, nonzero).
        if let Ok(key) = PrivateKey::from_bytes(&seed) {
            let sig = key.sign_schnorr(&digest).unwrap();
            let pub_key = PublicKey::from_bytes(&key.public_key().to_bytes()).unwrap();
            prop_assert!(pub_key.verify_schnorr(&digest, &sig));
        }
    }

    #[test]
    fn domains_never_collide(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let a = DomainHasher::hash(TRANSACTION_HASH_DOMAIN, &data);
        let b = DomainHasher::hash(TRANSACTION_ID_DOMAIN, &data);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn hash_hex_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let hash = Hash::new(bytes);
        let hash2: Hash = hash.to_string().parse().unwrap();
        prop_assert_eq!(hash, hash2);
    }
}
