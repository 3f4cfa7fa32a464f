//! # X25519 Key Agreement (`ECDH-ES+XC20PKW`)
//!
//! Per recipient:
//!
//! 1. Generate an ephemeral X25519 key and compute `Z = ECDH(epk, recipient)`.
//! 2. `KEK = ConcatKDF-SHA256(Z, 256, "ECDH-ES+XC20PKW", apu = "", apv = "")`
//!    (RFC 7518 §4.6.2, one round since the key is 256 bits).
//! 3. Wrap the content key with XChaCha20-Poly1305 under the KEK.
//!
//! The recipient header carries the ephemeral public key and the wrap IV and
//! tag; the decrypter reverses the steps with its static secret.

use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::trace;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::xc20p;
use super::{Decrypter, Encrypter, EphemeralPublicKey, JweError, JweRecipient, RecipientHeader};
use crate::config::{JWE_ALG_X25519, JWE_ENC_XC20P, KEK_LENGTH_BITS};
use crate::crypto::encoding::{b64url, b64url_decode};
use crate::crypto::sha256;

const KTY_OKP: &str = "OKP";
const CRV_X25519: &str = "X25519";

/// Concat KDF with SHA-256, single round.
pub(crate) fn concat_kdf(shared_secret: &[u8], alg: &str, apu: &[u8], apv: &[u8]) -> [u8; 32] {
    let round: u32 = 1;
    sha256(&[
        &round.to_be_bytes(),
        shared_secret,
        &(alg.len() as u32).to_be_bytes(),
        alg.as_bytes(),
        &(apu.len() as u32).to_be_bytes(),
        apu,
        &(apv.len() as u32).to_be_bytes(),
        apv,
        &KEK_LENGTH_BITS.to_be_bytes(),
    ])
}

// ---------------------------------------------------------------------------
// Encrypter
// ---------------------------------------------------------------------------

/// Wraps content keys for one X25519 public key.
#[derive(Debug, Clone)]
pub struct X25519Encrypter {
    public_key: PublicKey,
    kid: Option<String>,
}

impl X25519Encrypter {
    /// Encrypter for a 32-byte X25519 public key.
    pub fn new(public_key: &[u8]) -> Result<Self, JweError> {
        let bytes: [u8; 32] = public_key
            .try_into()
            .map_err(|_| JweError::InvalidPublicKey)?;
        Ok(Self {
            public_key: PublicKey::from(bytes),
            kid: None,
        })
    }

    /// Attach a key id (usually a DID URL) to emitted recipient headers.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// The recipient public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.public_key.to_bytes()
    }
}

#[async_trait]
impl Encrypter for X25519Encrypter {
    fn alg(&self) -> &str {
        JWE_ALG_X25519
    }

    fn enc(&self) -> &str {
        JWE_ENC_XC20P
    }

    async fn encrypt_cek(&self, cek: &[u8]) -> Result<JweRecipient, JweError> {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let epk = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.public_key);
        if !shared.was_contributory() {
            return Err(JweError::InvalidPublicKey);
        }

        let kek = Zeroizing::new(concat_kdf(shared.as_bytes(), JWE_ALG_X25519, &[], &[]));
        let wrapped = xc20p::seal(kek.as_slice(), cek, &[])?;
        trace!(kid = self.kid.as_deref(), "wrapped content key");

        Ok(JweRecipient {
            encrypted_key: b64url(&wrapped.ciphertext),
            header: RecipientHeader {
                alg: JWE_ALG_X25519.to_string(),
                iv: Some(b64url(&wrapped.iv)),
                tag: Some(b64url(&wrapped.tag)),
                epk: Some(EphemeralPublicKey {
                    kty: KTY_OKP.to_string(),
                    crv: CRV_X25519.to_string(),
                    x: b64url(epk.as_bytes()),
                }),
                kid: self.kid.clone(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Decrypter
// ---------------------------------------------------------------------------

/// Unwraps content keys with an X25519 static secret.
pub struct X25519Decrypter {
    secret: StaticSecret,
}

impl X25519Decrypter {
    /// Decrypter for a 32-byte X25519 secret (clamped internally).
    pub fn new(secret_key: &[u8; 32]) -> Self {
        Self {
            secret: StaticSecret::from(*secret_key),
        }
    }

    /// The matching public key.
    pub fn public_key(&self) -> [u8; 32] {
        PublicKey::from(&self.secret).to_bytes()
    }
}

impl std::fmt::Debug for X25519Decrypter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X25519Decrypter(pub={})", hex::encode(self.public_key()))
    }
}

#[async_trait]
impl Decrypter for X25519Decrypter {
    fn alg(&self) -> &str {
        JWE_ALG_X25519
    }

    fn enc(&self) -> &str {
        JWE_ENC_XC20P
    }

    async fn decrypt_cek(&self, recipient: &JweRecipient) -> Option<Zeroizing<Vec<u8>>> {
        let header = &recipient.header;
        let epk = header.epk.as_ref()?;
        if epk.crv != CRV_X25519 {
            return None;
        }
        let epk_bytes: [u8; 32] = b64url_decode(&epk.x).ok()?.try_into().ok()?;

        let shared = self.secret.diffie_hellman(&PublicKey::from(epk_bytes));
        if !shared.was_contributory() {
            return None;
        }
        let kek = Zeroizing::new(concat_kdf(shared.as_bytes(), JWE_ALG_X25519, &[], &[]));

        let iv = b64url_decode(header.iv.as_deref()?).ok()?;
        let tag = b64url_decode(header.tag.as_deref()?).ok()?;
        let wrapped = b64url_decode(&recipient.encrypted_key).ok()?;
        xc20p::open(kek.as_slice(), &iv, &wrapped, &tag, &[]).map(Zeroizing::new)
    }
}
