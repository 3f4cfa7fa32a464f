//! Property tests for the codecs and derivation.

use proptest::prelude::*;

use hd_did::did::{encode_did_key, extract_did_key, parse_did};
use hd_did::hdkey::{is_valid_path, DerivationPath, HdKey};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn did_key_roundtrip(key in proptest::array::uniform32(any::<u8>())) {
        let did = encode_did_key(&key);
        prop_assert!(did.starts_with("did:key:z6Mk"));
        prop_assert_eq!(extract_did_key(&did).unwrap(), key.to_vec());

        let parsed = parse_did(&did).unwrap();
        prop_assert_eq!(parsed.method, "key");
        prop_assert_eq!(format!("did:key:{}", parsed.identifier), did);
    }

    #[test]
    fn generated_paths_are_valid(
        segments in proptest::collection::vec((any::<u32>(), any::<bool>()), 0..6)
    ) {
        let mut path = String::from("m");
        for (index, hardened) in &segments {
            path.push_str(&format!("/{index}{}", if *hardened { "'" } else { "" }));
        }
        prop_assert!(is_valid_path(&path));

        let parsed: DerivationPath = path.parse().unwrap();
        prop_assert_eq!(parsed.depth(), segments.len());
        prop_assert_eq!(parsed.to_string(), path);
    }

    #[test]
    fn paths_without_m_are_invalid(s in "[a-ln-z0-9/']{1,12}") {
        prop_assert!(!is_valid_path(&s));
    }

    #[test]
    fn derivation_is_deterministic(
        password in ".{0,24}",
        a in 0u32..1000,
        b in 0u32..1000,
    ) {
        let hd = HdKey::from_password(&password);
        let path = format!("m/{a}'/{b}'");
        let (_, first) = hd.derive_key_path(&path).unwrap();
        let (_, second) = HdKey::from_password(&password).derive_key_path(&path).unwrap();
        prop_assert_eq!(first.public_key(), second.public_key());
    }
}
