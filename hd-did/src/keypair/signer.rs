//! Detached Ed25519 signer in the JWT convention: bytes or text in,
//! base64url signature out.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use zeroize::Zeroizing;

use super::{EdKeypair, KeyError};
use crate::config::{SECRET_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::encoding::b64url;

/// Signs messages with a fixed Ed25519 key.
///
/// Only constructible from a full 64-byte secret key, so a signer can never
/// exist before some derivation has produced one.
#[derive(Clone)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Build a signer from 64 bytes of secret key material.
    pub fn new(secret_key: &[u8]) -> Result<Self, KeyError> {
        if secret_key.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                expected: SECRET_KEY_LENGTH,
                actual: secret_key.len(),
            });
        }
        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&secret_key[..32]);
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Sign and return the base64url (unpadded) signature.
    pub fn sign(&self, data: impl AsRef<[u8]>) -> String {
        b64url(&self.sign_bytes(data))
    }

    /// Sign and return the raw 64-byte signature.
    pub fn sign_bytes(&self, data: impl AsRef<[u8]>) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(data.as_ref()).to_bytes()
    }

    /// The public key signatures verify against.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl From<&EdKeypair> for Ed25519Signer {
    fn from(kp: &EdKeypair) -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&kp.secret_bytes()[..32]);
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signer(pub={})", hex::encode(self.public_key()))
    }
}
