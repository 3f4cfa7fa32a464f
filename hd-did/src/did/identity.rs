//! # DID Identity
//!
//! A [`DidIdentity`] owns an X25519 static secret taken from the leading 32
//! bytes of a 64-byte secret key (the same layout the HD tree exports), and
//! uses it to open JWEs addressed to its DID.
//!
//! The DID itself is the X25519 public key wrapped with the Ed25519
//! multicodec tag, so `did()` of an identity is not the same string as
//! `Keypair::did()` for the same secret.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use zeroize::Zeroizing;

use super::{codec, Did, DidError};
use crate::config::{JWE_ALG_X25519, KEY_LENGTH};
use crate::jwe::{self, Encrypter, Jwe, JweError, X25519Decrypter, X25519Encrypter};
use crate::keypair::KeyError;

/// One addressee of [`DidIdentity::create_jwe`].
#[derive(Clone)]
pub enum Recipient {
    /// A ready-made encrypter.
    Encrypter(Arc<dyn Encrypter>),
    /// A raw 32-byte X25519 public key.
    PublicKey(Vec<u8>),
}

impl std::fmt::Debug for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recipient::Encrypter(e) => write!(f, "Recipient::Encrypter({})", e.alg()),
            Recipient::PublicKey(k) => write!(f, "Recipient::PublicKey({})", hex::encode(k)),
        }
    }
}

impl From<Vec<u8>> for Recipient {
    fn from(key: Vec<u8>) -> Self {
        Recipient::PublicKey(key)
    }
}

impl From<[u8; 32]> for Recipient {
    fn from(key: [u8; 32]) -> Self {
        Recipient::PublicKey(key.to_vec())
    }
}

impl From<Arc<dyn Encrypter>> for Recipient {
    fn from(encrypter: Arc<dyn Encrypter>) -> Self {
        Recipient::Encrypter(encrypter)
    }
}

impl From<X25519Encrypter> for Recipient {
    fn from(encrypter: X25519Encrypter) -> Self {
        Recipient::Encrypter(Arc::new(encrypter))
    }
}

/// Optional inputs to [`DidIdentity::create_jwe`].
#[derive(Debug, Clone, Default)]
pub struct CreateJweOptions {
    pub protected_header: Option<Map<String, Value>>,
    pub aad: Option<Vec<u8>>,
}

/// A DID holder able to encrypt to other DIDs and decrypt for itself.
pub struct DidIdentity {
    private_key: Zeroizing<[u8; KEY_LENGTH]>,
    public_key: [u8; 32],
}

impl DidIdentity {
    /// Build an identity from a secret key of at least 32 bytes.
    pub fn new(secret_key: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; KEY_LENGTH] = secret_key
            .get(..KEY_LENGTH)
            .and_then(|s| s.try_into().ok())
            .ok_or(KeyError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: secret_key.len(),
            })?;
        let private_key = Zeroizing::new(seed);
        let public_key = X25519Decrypter::new(&private_key).public_key();
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// X25519 public key.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// `did:key` for [`Self::public_key`].
    pub fn did(&self) -> String {
        codec::encode_did_key(&self.public_key)
    }

    /// Recover a public key from someone else's `did:key`.
    pub fn extract_did_key(&self, did: &str) -> Result<Vec<u8>, DidError> {
        codec::extract_did_key(did)
    }

    /// Splits any `did:<method>:<identifier>` string into method and identifier.
    pub fn parse_did(did: &str) -> Result<Did, DidError> {
        codec::parse_did(did)
    }

    /// True when `did` parses as a DID of any method.
    pub fn is_valid_did(did: &str) -> bool {
        codec::is_valid_did(did)
    }

    /// Encrypt `cleartext` to `recipients`.
    ///
    /// If none of the recipients is already an `ECDH-ES+XC20PKW` encrypter,
    /// every raw public key is wrapped in one. Otherwise the list is taken
    /// as-is and a raw key in it is an error.
    pub async fn create_jwe(
        &self,
        cleartext: &str,
        recipients: Vec<Recipient>,
        options: CreateJweOptions,
    ) -> Result<Jwe, JweError> {
        let has_x25519 = recipients
            .iter()
            .any(|r| matches!(r, Recipient::Encrypter(e) if e.alg() == JWE_ALG_X25519));

        let encrypters = recipients
            .into_iter()
            .map(|recipient| match recipient {
                Recipient::Encrypter(e) => Ok(e),
                Recipient::PublicKey(_) if has_x25519 => Err(JweError::UnwrappedRecipient),
                Recipient::PublicKey(key) => {
                    Ok(Arc::new(X25519Encrypter::new(&key)?) as Arc<dyn Encrypter>)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(recipients = encrypters.len(), "encrypting to recipients");
        jwe::create_jwe(
            cleartext.as_bytes(),
            &encrypters,
            options.protected_header,
            options.aad.as_deref(),
        )
        .await
    }

    /// Decrypt a JWE addressed to this identity.
    pub async fn decrypt_jwe(&self, jwe: &Jwe) -> Result<String, JweError> {
        let decrypter = X25519Decrypter::new(&self.private_key);
        let bytes = jwe::decrypt_jwe(jwe, &decrypter).await?;
        String::from_utf8(bytes).map_err(|_| JweError::InvalidUtf8)
    }
}

impl std::fmt::Debug for DidIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DidIdentity({})", self.did())
    }
}
