//! # JSON Web Encryption
//!
//! General JSON serialization of a multi-recipient JWE:
//!
//! ```text
//! {
//!   "protected":  b64url({...header, "enc": "XC20P"}),
//!   "iv", "ciphertext", "tag":  content sealed under a random CEK,
//!   "aad":        optional caller AAD,
//!   "recipients": [{ "encrypted_key", "header": {alg, iv, tag, epk, kid?} }]
//! }
//! ```
//!
//! The content AAD is the ASCII of the `protected` field, followed by
//! `"." + aad` when caller AAD is present. Every binary field is base64url
//! without padding.
//!
//! Key management is pluggable through [`Encrypter`] and [`Decrypter`];
//! [`x25519`] provides the `ECDH-ES+XC20PKW` pair.
//!
//! Decryption failures are deliberately indistinguishable: a wrong key, a
//! tampered field or a missing recipient all yield
//! [`JweError::DecryptionFailed`].

pub mod x25519;
mod xc20p;

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{CEK_LENGTH, JWE_ENC_XC20P};
use crate::crypto::encoding::{b64url, b64url_decode};

pub use x25519::{X25519Decrypter, X25519Encrypter};

/// Errors from JWE creation and decryption.
#[derive(Debug, Error)]
pub enum JweError {
    #[error("at least one recipient is required")]
    NoRecipients,

    #[error("all encrypters must share the same content encryption")]
    MixedContentEncryption,

    #[error("unsupported content encryption: {0}")]
    UnsupportedContentEncryption(String),

    #[error("invalid recipient public key")]
    InvalidPublicKey,

    #[error("recipient public key was not wrapped in an encrypter")]
    UnwrappedRecipient,

    #[error("encryption failed")]
    EncryptionFailed,

    /// Single opaque failure for every decryption problem.
    #[error("failed to decrypt")]
    DecryptionFailed,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8,
}

impl From<serde_json::Error> for JweError {
    fn from(e: serde_json::Error) -> Self {
        JweError::Serialization(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// A JWE in General JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwe {
    pub protected: String,
    pub iv: String,
    pub ciphertext: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
    #[serde(default)]
    pub recipients: Vec<JweRecipient>,
}

impl Jwe {
    /// Decode the protected header.
    pub fn protected_header(&self) -> Result<Map<String, Value>, JweError> {
        let bytes =
            b64url_decode(&self.protected).map_err(|e| JweError::Serialization(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// One wrapped copy of the content key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweRecipient {
    pub encrypted_key: String,
    pub header: RecipientHeader,
}

/// Per-recipient unprotected header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epk: Option<EphemeralPublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// JWK of the sender's ephemeral key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralPublicKey {
    pub kty: String,
    pub crv: String,
    pub x: String,
}

// ---------------------------------------------------------------------------
// Key management traits
// ---------------------------------------------------------------------------

/// Wraps a content key for one recipient.
#[async_trait]
pub trait Encrypter: Send + Sync {
    /// Key management algorithm, e.g. `ECDH-ES+XC20PKW`.
    fn alg(&self) -> &str;

    /// Content encryption this encrypter pairs with, e.g. `XC20P`.
    fn enc(&self) -> &str;

    async fn encrypt_cek(&self, cek: &[u8]) -> Result<JweRecipient, JweError>;
}

/// Recovers a content key from a recipient entry addressed to it.
#[async_trait]
pub trait Decrypter: Send + Sync {
    fn alg(&self) -> &str;

    fn enc(&self) -> &str;

    /// `None` if this recipient entry cannot be unwrapped by this key.
    async fn decrypt_cek(&self, recipient: &JweRecipient) -> Option<Zeroizing<Vec<u8>>>;
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Encrypt `cleartext` to every encrypter in `encrypters`.
///
/// Any `alg` in `protected_header` is dropped and `enc` is forced to
/// `XC20P`.
pub async fn create_jwe(
    cleartext: &[u8],
    encrypters: &[Arc<dyn Encrypter>],
    protected_header: Option<Map<String, Value>>,
    aad: Option<&[u8]>,
) -> Result<Jwe, JweError> {
    let first = encrypters.first().ok_or(JweError::NoRecipients)?;
    let enc = first.enc();
    if encrypters.iter().any(|e| e.enc() != enc) {
        return Err(JweError::MixedContentEncryption);
    }
    if enc != JWE_ENC_XC20P {
        return Err(JweError::UnsupportedContentEncryption(enc.to_string()));
    }

    let mut header = protected_header.unwrap_or_default();
    header.remove("alg");
    header.insert("enc".to_string(), Value::String(JWE_ENC_XC20P.to_string()));
    let protected = b64url(&serde_json::to_vec(&header)?);

    let encoded_aad = aad.map(b64url);
    let content_aad = content_aad(&protected, encoded_aad.as_deref());

    let mut cek = Zeroizing::new([0u8; CEK_LENGTH]);
    OsRng.fill_bytes(cek.as_mut_slice());
    let sealed = xc20p::seal(cek.as_slice(), cleartext, content_aad.as_bytes())?;

    let mut recipients = Vec::with_capacity(encrypters.len());
    for encrypter in encrypters {
        recipients.push(encrypter.encrypt_cek(cek.as_slice()).await?);
    }
    debug!(recipients = recipients.len(), "created JWE");

    Ok(Jwe {
        protected,
        iv: b64url(&sealed.iv),
        ciphertext: b64url(&sealed.ciphertext),
        tag: b64url(&sealed.tag),
        aad: encoded_aad,
        recipients,
    })
}

/// Decrypt `jwe` with `decrypter`, trying every recipient whose `alg`
/// matches until one opens the content.
pub async fn decrypt_jwe(jwe: &Jwe, decrypter: &dyn Decrypter) -> Result<Vec<u8>, JweError> {
    let result = try_decrypt(jwe, decrypter).await;
    if result.is_none() {
        debug!(recipients = jwe.recipients.len(), "JWE decryption failed");
    }
    result.ok_or(JweError::DecryptionFailed)
}

async fn try_decrypt(jwe: &Jwe, decrypter: &dyn Decrypter) -> Option<Vec<u8>> {
    let header = jwe.protected_header().ok()?;
    if header.get("enc").and_then(Value::as_str) != Some(decrypter.enc()) {
        return None;
    }

    let iv = b64url_decode(&jwe.iv).ok()?;
    let ciphertext = b64url_decode(&jwe.ciphertext).ok()?;
    let tag = b64url_decode(&jwe.tag).ok()?;
    let content_aad = content_aad(&jwe.protected, jwe.aad.as_deref());

    for recipient in jwe.recipients.iter().filter(|r| r.header.alg == decrypter.alg()) {
        let Some(cek) = decrypter.decrypt_cek(recipient).await else {
            continue;
        };
        if let Some(cleartext) =
            xc20p::open(cek.as_slice(), &iv, &ciphertext, &tag, content_aad.as_bytes())
        {
            return Some(cleartext);
        }
    }
    None
}

fn content_aad(protected: &str, encoded_aad: Option<&str>) -> String {
    match encoded_aad {
        Some(aad) => format!("{protected}.{aad}"),
        None => protected.to_string(),
    }
}
