// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # hd-did — Core Library
//!
//! Password-rooted hierarchical Ed25519 keys that double as `did:key`
//! identities, plus JWE encryption between those identities.
//!
//! One password yields one master key; every path under it yields one
//! keypair; every keypair has one DID. Nothing is stored, so the password
//! *is* the backup.
//!
//! ## Architecture
//!
//! - **hdkey** — Keccak-256 + HMAC-SHA512 master key, SLIP-0010 style child
//!   extension, path parsing, signed-key mixing.
//! - **keypair** — Ed25519 keypairs, a detached signer, export formats.
//! - **did** — the `did:key` codec and [`DidIdentity`], which encrypts to
//!   and decrypts from other DIDs.
//! - **jwe** — JSON Web Encryption with `ECDH-ES+XC20PKW` key wrapping.
//! - **crypto** — hashes and string encodings shared by the above.
//! - **config** — protocol constants.
//!
//! ## Quick Tour
//!
//! ```
//! use hd_did::{did, HdKey};
//!
//! let hd = HdKey::from_password("correct horse battery staple");
//! let (signer, keypair) = hd.derive_key_path("m/44'/0'").unwrap();
//!
//! let did = keypair.did();
//! assert_eq!(did::extract_did_key(&did).unwrap(), keypair.public_key());
//!
//! let signature = signer.sign("hello");
//! assert!(!signature.contains('='));
//! ```

pub mod config;
pub mod crypto;
pub mod did;
pub mod hdkey;
pub mod jwe;
pub mod keypair;

pub use crypto::Encoding;
pub use did::{Did, DidError, DidIdentity};
pub use hdkey::{HdKey, HdKeyError};
pub use jwe::{Jwe, JweError};
pub use keypair::{Ed25519Signer, EdKeypair, ExportedKeyPair, KeyError, KeyType, Keypair};
