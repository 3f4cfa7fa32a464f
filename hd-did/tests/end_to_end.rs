//! End-to-end integration tests for hd-did.
//!
//! These walk the whole flow a user sees: a password becomes a tree, a path
//! becomes a keypair, the keypair becomes a DID, and two DIDs exchange an
//! encrypted message. Only the public API is used.

use hd_did::did::{self, CreateJweOptions, DidError, DidIdentity, Recipient};
use hd_did::hdkey::{is_valid_path, HdKey};
use hd_did::jwe::JweError;
use hd_did::{Encoding, KeyError};

const PASSWORD: &str = "correct horse battery staple";
const KNOWN_DID: &str = "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Identity for the exported key at `path` under `password`.
fn identity_at(password: &str, path: &str) -> DidIdentity {
    let exported = HdKey::from_password(password)
        .export_key_path(path)
        .unwrap();
    let secret = Encoding::Base64Pad.decode(&exported.secret_key).unwrap();
    DidIdentity::new(&secret).unwrap()
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

#[test]
fn same_password_same_tree() {
    let a = HdKey::from_password(PASSWORD);
    let b = HdKey::from_password(PASSWORD);
    assert_eq!(a.chain_code(), b.chain_code());

    let (_, ka) = a.derive_key_path("m/0'/1'/2'").unwrap();
    let (_, kb) = b.derive_key_path("m/0'/1'/2'").unwrap();
    assert_eq!(ka.public_key(), kb.public_key());
    assert_eq!(ka.did(), kb.did());
}

#[test]
fn different_passwords_differ() {
    let a = HdKey::from_password("alpha");
    let b = HdKey::from_password("bravo");
    assert_ne!(a.chain_code(), b.chain_code());
    assert_ne!(
        a.derive_key_path("m").unwrap().1.public_key(),
        b.derive_key_path("m").unwrap().1.public_key()
    );
}

#[test]
fn different_paths_differ() {
    let hd = HdKey::from_password(PASSWORD);
    let paths = ["m", "m/0'", "m/1'", "m/0'/0'", "m/0'/1'", "m/44'/0'/0'"];
    let keys: Vec<Vec<u8>> = paths
        .iter()
        .map(|p| hd.derive_key_path(p).unwrap().1.public_key().to_vec())
        .collect();
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            assert_ne!(keys[i], keys[j], "{} vs {}", paths[i], paths[j]);
        }
    }
}

#[test]
fn hardened_marker_does_not_change_the_key() {
    let hd = HdKey::from_password(PASSWORD);
    assert_eq!(
        hd.derive_key_path("m/7").unwrap().1.public_key(),
        hd.derive_key_path("m/7'").unwrap().1.public_key()
    );
}

#[test]
fn offset_changes_the_key() {
    let hd = HdKey::from_password(PASSWORD);
    let (_, hardened) = hd.derive_key_path("m/5").unwrap();
    let (_, plain) = hd.derive_key_path_with_offset("m/5", 0).unwrap();
    assert_ne!(hardened.public_key(), plain.public_key());
}

#[test]
fn path_validity() {
    assert!(is_valid_path("m/0'/1'/2'"));
    assert!(is_valid_path("m"));
    assert!(!is_valid_path("m/abc"));
    assert!(!is_valid_path("notstartingwithm"));
    assert!(!is_valid_path("m/4294967296"));
}

#[test]
fn invalid_path_is_rejected_before_derivation() {
    let hd = HdKey::from_password(PASSWORD);
    assert!(hd.derive_key_path("m/abc").is_err());
    assert!(hd.export_key_path("x/0").is_err());
}

// ---------------------------------------------------------------------------
// Signing and export
// ---------------------------------------------------------------------------

#[test]
fn signer_and_keypair_agree() {
    let hd = HdKey::from_password(PASSWORD);
    let (signer, keypair) = hd.derive_key_path("m/0'").unwrap();
    assert_eq!(&signer.public_key()[..], keypair.public_key());

    let signature = signer.sign("payload");
    let raw = Encoding::Base64Url.decode(&signature).unwrap();
    assert_eq!(raw, keypair.sign(b"payload"));
    assert!(keypair.as_ed25519().unwrap().verify(b"payload", &raw));
}

#[test]
fn derived_keypairs_are_not_exportable_but_exports_match() {
    let hd = HdKey::from_password(PASSWORD);
    let (_, keypair) = hd.derive_key_path("m/3'").unwrap();
    assert!(matches!(
        keypair.export(Encoding::Base64Pad),
        Err(KeyError::NotExportable)
    ));

    let exported = hd.export_key_path("m/3'").unwrap();
    assert_eq!(
        exported.public_key,
        keypair.public_key_str(Encoding::Base64Pad).unwrap()
    );
    let again = HdKey::export_ed_keypair(
        &Encoding::Base64Pad.decode(&exported.secret_key).unwrap(),
    )
    .unwrap();
    assert_eq!(again, exported);
}

#[test]
fn signed_key_mixing_is_separate_from_paths() {
    let hd = HdKey::from_password(PASSWORD);
    let (_, mixed) = hd.create_ed_keypair("deadbeef").unwrap();
    let (_, again) = hd.create_ed_keypair("deadbeef").unwrap();
    let (_, other) = hd.create_ed_keypair("deadbeee").unwrap();
    let (_, pathed) = hd.derive_key_path("m").unwrap();

    assert_eq!(mixed.public_key(), again.public_key());
    assert_ne!(mixed.public_key(), other.public_key());
    assert_ne!(mixed.public_key(), pathed.public_key());
}

// ---------------------------------------------------------------------------
// DIDs
// ---------------------------------------------------------------------------

#[test]
fn keypair_did_roundtrips() {
    let hd = HdKey::from_password(PASSWORD);
    let (_, keypair) = hd.derive_key_path("m/1'").unwrap();
    let did = keypair.did();
    assert!(did.starts_with("did:key:z6Mk"));
    assert_eq!(did::extract_did_key(&did).unwrap(), keypair.public_key());
}

#[test]
fn known_did_behaviour() {
    assert!(did::is_valid_did(KNOWN_DID));
    assert!(!did::is_valid_did("invalid:did:format"));

    let parsed = did::parse_did(KNOWN_DID).unwrap();
    assert_eq!(parsed.method, "key");
    assert_eq!(
        parsed.identifier,
        "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
    );

    assert!(matches!(
        did::extract_did_key("did:web:example.com"),
        Err(DidError::Format)
    ));
}

// ---------------------------------------------------------------------------
// Encryption
// ---------------------------------------------------------------------------

#[tokio::test]
async fn alice_sends_bob_a_message() {
    let alice = identity_at("alice's password", "m/0'");
    let bob = identity_at("bob's password", "m/0'");

    let bob_key = alice.extract_did_key(&bob.did()).unwrap();
    let jwe = alice
        .create_jwe(
            "héllo bob, 你好 🌍",
            vec![Recipient::PublicKey(bob_key)],
            CreateJweOptions::default(),
        )
        .await
        .unwrap();

    // Through JSON and back, as it would travel.
    let wire = serde_json::to_string(&jwe).unwrap();
    let received = serde_json::from_str(&wire).unwrap();
    assert_eq!(bob.decrypt_jwe(&received).await.unwrap(), "héllo bob, 你好 🌍");
}

#[tokio::test]
async fn eavesdropper_learns_nothing() {
    let alice = identity_at("alice's password", "m/0'");
    let bob = identity_at("bob's password", "m/0'");
    let eve = identity_at("bob's password", "m/1'");

    let jwe = alice
        .create_jwe(
            "for bob only",
            vec![bob.public_key().to_vec().into()],
            CreateJweOptions::default(),
        )
        .await
        .unwrap();
    assert!(matches!(
        eve.decrypt_jwe(&jwe).await,
        Err(JweError::DecryptionFailed)
    ));
}

#[tokio::test]
async fn broadcast_to_many() {
    let sender = identity_at(PASSWORD, "m/0'");
    let readers: Vec<DidIdentity> = (1..=4)
        .map(|i| identity_at(PASSWORD, &format!("m/{i}'")))
        .collect();

    let recipients = readers
        .iter()
        .map(|r| Recipient::PublicKey(r.public_key().to_vec()))
        .collect();
    let jwe = sender
        .create_jwe("team update", recipients, CreateJweOptions::default())
        .await
        .unwrap();
    assert_eq!(jwe.recipients.len(), 4);

    for reader in &readers {
        assert_eq!(reader.decrypt_jwe(&jwe).await.unwrap(), "team update");
    }
    assert!(sender.decrypt_jwe(&jwe).await.is_err());
}

#[tokio::test]
async fn signing_did_and_encryption_did_are_distinct() {
    let hd = HdKey::from_password("bob's password");
    let exported = hd.export_key_path("m/0'").unwrap();
    let secret = Encoding::Base64Pad.decode(&exported.secret_key).unwrap();
    let public_key = Encoding::Base64Pad.decode(&exported.public_key).unwrap();

    let signing_did = did::encode_did_key(&public_key);
    let bob = DidIdentity::new(&secret).unwrap();
    assert_ne!(signing_did, bob.did());

    let alice = identity_at("alice's password", "m/0'");

    // Encrypting to the X25519 key inside the encryption DID reaches bob.
    let to = alice.extract_did_key(&bob.did()).unwrap();
    let jwe = alice
        .create_jwe("right did", vec![to.into()], CreateJweOptions::default())
        .await
        .unwrap();
    assert_eq!(bob.decrypt_jwe(&jwe).await.unwrap(), "right did");

    // The Ed25519 bytes of the signing DID are not bob's X25519 key.
    let wrong = alice.extract_did_key(&signing_did).unwrap();
    let jwe = alice
        .create_jwe("wrong did", vec![wrong.into()], CreateJweOptions::default())
        .await
        .unwrap();
    assert!(matches!(
        bob.decrypt_jwe(&jwe).await,
        Err(JweError::DecryptionFailed)
    ));
}
