//! # Keypairs
//!
//! Signable, exportable key material. The set of supported key types is
//! closed and small, so it is modelled as an enum ([`Keypair`]) rather than
//! a trait object: every variant answers the same questions (`sign`,
//! `export`, `public_key_str`, `did`) and adding a type means adding a
//! multicodec tag to [`KeyType`] and a variant here.
//!
//! Secret keys are 64 bytes throughout: a 32-byte Ed25519 seed followed by
//! 32 bytes of trailing material (the public key for freshly generated
//! keys, the chain code for tree-derived keys). The public key is always
//! recomputed from the seed and can never be supplied separately.

pub mod ed25519;
pub mod signer;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EDWARDS_DID_PREFIX;
use crate::crypto::{Encoding, EncodingError};

pub use ed25519::EdKeypair;
pub use signer::Ed25519Signer;

/// Errors from keypair construction, signing and export.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Secret key material has the wrong size for the operation.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The secret key string could not be decoded.
    #[error("failed to decode key material: {0}")]
    Decoding(#[from] EncodingError),

    /// The keypair was created with `exportable = false`.
    #[error("key is not exportable")]
    NotExportable,
}

// ---------------------------------------------------------------------------
// KeyType
// ---------------------------------------------------------------------------

/// Supported key types, each identified on the wire by a multicodec tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Ed25519,
}

impl KeyType {
    /// Multicodec varint prefix used when the public key is put in a DID.
    pub fn multicodec(self) -> [u8; 2] {
        match self {
            KeyType::Ed25519 => EDWARDS_DID_PREFIX,
        }
    }

    /// Lowercase name, as used in JSON.
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// A keypair of one of the supported [`KeyType`]s.
#[derive(Clone, PartialEq, Eq)]
pub enum Keypair {
    Ed25519(EdKeypair),
}

impl Keypair {
    /// Which key type this is.
    pub fn key_type(&self) -> KeyType {
        match self {
            Keypair::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> &[u8] {
        match self {
            Keypair::Ed25519(kp) => kp.public_key(),
        }
    }

    /// Sign `message`. Deterministic for Ed25519.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Keypair::Ed25519(kp) => kp.sign(message).to_vec(),
        }
    }

    /// Serialize the secret key in `format`.
    pub fn export(&self, format: Encoding) -> Result<String, KeyError> {
        match self {
            Keypair::Ed25519(kp) => kp.export(format),
        }
    }

    /// Encode the public key in `format`.
    pub fn public_key_str(&self, format: Encoding) -> Result<String, KeyError> {
        Ok(format.encode(self.public_key())?)
    }

    /// The `did:key` identifier of this keypair's public key.
    pub fn did(&self) -> String {
        crate::did::codec::encode_did(self.public_key(), self.key_type())
    }

    /// Export both halves as base64pad strings.
    pub fn to_exported(&self) -> Result<ExportedKeyPair, KeyError> {
        match self {
            Keypair::Ed25519(kp) => kp.to_exported(),
        }
    }

    /// Borrow the Ed25519 keypair, if that is what this is.
    pub fn as_ed25519(&self) -> Option<&EdKeypair> {
        match self {
            Keypair::Ed25519(kp) => Some(kp),
        }
    }
}

impl From<EdKeypair> for Keypair {
    fn from(kp: EdKeypair) -> Self {
        Keypair::Ed25519(kp)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keypair::Ed25519(kp) => fmt::Debug::fmt(kp, f),
        }
    }
}

// ---------------------------------------------------------------------------
// ExportedKeyPair
// ---------------------------------------------------------------------------

/// Both halves of a keypair as base64pad strings.
///
/// This is a plain data carrier for handing keys to callers that store them
/// elsewhere. It holds the secret in the clear, so it deliberately has no
/// `Debug` output for the secret half.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedKeyPair {
    pub public_key: String,
    pub secret_key: String,
}

impl ExportedKeyPair {
    /// Build an export from raw 64-byte secret key material.
    ///
    /// The public key is recomputed from the secret, exactly as
    /// [`EdKeypair::from_secret_bytes`] would.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self, KeyError> {
        EdKeypair::from_secret_bytes(secret_key, true)?.to_exported()
    }
}

impl fmt::Debug for ExportedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedKeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_multicodec() {
        assert_eq!(KeyType::Ed25519.multicodec(), [0xed, 0x01]);
        assert_eq!(KeyType::Ed25519.to_string(), "ed25519");
    }

    #[test]
    fn test_keypair_did_starts_with_key_method() {
        let kp = Keypair::from(EdKeypair::create(true));
        assert!(kp.did().starts_with("did:key:z6Mk"), "got {}", kp.did());
    }

    #[test]
    fn test_keypair_public_key_str_base58() {
        let kp = Keypair::from(EdKeypair::create(true));
        let text = kp.public_key_str(Encoding::Base58Btc).unwrap();
        assert_eq!(bs58::decode(text).into_vec().unwrap(), kp.public_key());
    }

    #[test]
    fn test_exported_keypair_serializes_camel_case() {
        let kp = Keypair::from(EdKeypair::create(true));
        let exported = kp.to_exported().unwrap();
        let json = serde_json::to_value(&exported).unwrap();
        assert!(json.get("publicKey").is_some());
        assert!(json.get("secretKey").is_some());
    }

    #[test]
    fn test_exported_debug_redacts_secret() {
        let kp = Keypair::from(EdKeypair::create(true));
        let exported = kp.to_exported().unwrap();
        let debug = format!("{:?}", exported);
        assert!(!debug.contains(&exported.secret_key));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_exported_from_secret_key_rejects_short_input() {
        let err = ExportedKeyPair::from_secret_key(&[0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            KeyError::InvalidKeyLength {
                expected: 64,
                actual: 32
            }
        ));
    }
}
