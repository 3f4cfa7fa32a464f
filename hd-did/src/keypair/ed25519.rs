//! # Ed25519 Keypairs
//!
//! [`EdKeypair`] wraps an `ed25519-dalek` signing key together with the
//! 64-byte secret key it was built from.
//!
//! ## Secret key layout
//!
//! ```text
//! secret_key = seed (32 bytes) || trailing (32 bytes)
//! ```
//!
//! Only the seed feeds Ed25519. The trailing half is carried verbatim so
//! that an exported key re-imports to the same bytes: for generated keys it
//! is the public key, for tree-derived keys it is the chain code.
//!
//! ## Security considerations
//!
//! - The secret bytes are zeroized on drop, the signing key by
//!   ed25519-dalek.
//! - Key bytes are never logged and never appear in `Debug` output.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH as SEED_LENGTH};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::{ExportedKeyPair, KeyError};
use crate::config::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::Encoding;

/// An Ed25519 keypair built from 64 bytes of secret key material.
///
/// # Examples
///
/// ```
/// use hd_did::keypair::EdKeypair;
/// use hd_did::crypto::Encoding;
///
/// let kp = EdKeypair::create(true);
/// let exported = kp.export(Encoding::Base64Pad).unwrap();
/// let restored = EdKeypair::from_secret_key(&exported, Encoding::Base64Pad, true).unwrap();
/// assert_eq!(kp.public_key(), restored.public_key());
/// ```
pub struct EdKeypair {
    secret_key: Zeroizing<[u8; SECRET_KEY_LENGTH]>,
    signing_key: SigningKey,
    public_key: [u8; PUBLIC_KEY_LENGTH],
    exportable: bool,
}

impl EdKeypair {
    /// Generate a fresh keypair from the OS RNG.
    ///
    /// The resulting secret key is `seed || public_key`, the conventional
    /// 64-byte Ed25519 layout.
    pub fn create(exportable: bool) -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key, exportable)
    }

    /// Decode `encoded` with `format` and build a keypair from the bytes.
    ///
    /// The public key is re-derived from the secret; there is no way to
    /// pass one in.
    pub fn from_secret_key(
        encoded: &str,
        format: Encoding,
        exportable: bool,
    ) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(format.decode(encoded)?);
        Self::from_secret_bytes(&bytes, exportable)
    }

    /// Build a keypair from raw 64-byte secret key material.
    pub fn from_secret_bytes(secret_key: &[u8], exportable: bool) -> Result<Self, KeyError> {
        let bytes: [u8; SECRET_KEY_LENGTH] =
            secret_key
                .try_into()
                .map_err(|_| KeyError::InvalidKeyLength {
                    expected: SECRET_KEY_LENGTH,
                    actual: secret_key.len(),
                })?;
        let secret_key = Zeroizing::new(bytes);

        let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
        seed.copy_from_slice(&secret_key[..SEED_LENGTH]);
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = signing_key.verifying_key().to_bytes();

        Ok(Self {
            secret_key,
            signing_key,
            public_key,
            exportable,
        })
    }

    fn from_signing_key(signing_key: SigningKey, exportable: bool) -> Self {
        let public_key = signing_key.verifying_key().to_bytes();
        let mut secret_key = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        secret_key[..SEED_LENGTH].copy_from_slice(signing_key.as_bytes());
        secret_key[SEED_LENGTH..].copy_from_slice(&public_key);
        Self {
            secret_key,
            signing_key,
            public_key,
            exportable,
        }
    }

    /// The 32-byte Ed25519 public key.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.public_key
    }

    /// Whether [`export`](Self::export) is permitted.
    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    /// Sign `message`. Same key and message always give the same signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature made by this keypair.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        self.signing_key
            .verifying_key()
            .verify_strict(message, &sig)
            .is_ok()
    }

    /// Serialize the full 64-byte secret key.
    ///
    /// Fails with [`KeyError::NotExportable`] for keypairs created with
    /// `exportable = false`.
    pub fn export(&self, format: Encoding) -> Result<String, KeyError> {
        if !self.exportable {
            return Err(KeyError::NotExportable);
        }
        Ok(format.encode(self.secret_key.as_slice())?)
    }

    /// Both halves as base64pad strings.
    pub fn to_exported(&self) -> Result<ExportedKeyPair, KeyError> {
        Ok(ExportedKeyPair {
            public_key: Encoding::Base64Pad.encode(&self.public_key)?,
            secret_key: self.export(Encoding::Base64Pad)?,
        })
    }

    /// Raw secret key bytes, for building a detached signer.
    pub(crate) fn secret_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.secret_key
    }
}

impl Clone for EdKeypair {
    fn clone(&self) -> Self {
        Self {
            secret_key: self.secret_key.clone(),
            signing_key: self.signing_key.clone(),
            public_key: self.public_key,
            exportable: self.exportable,
        }
    }
}

impl PartialEq for EdKeypair {
    /// Compares public keys only; secret bytes are not compared in
    /// variable time.
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for EdKeypair {}

impl fmt::Debug for EdKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdKeypair(pub={})", hex::encode(self.public_key))
    }
}
