//! # The Key Tree
//!
//! [`HdKey`] owns a password-derived master key and hands out child
//! keypairs. It holds no other state: every derivation returns its signer
//! and keypair directly, so call order never matters.
//!
//! ## Child extension
//!
//! ```text
//! I           = HMAC-SHA512(key = parent.chain_code,
//!                           data = 0x00 || parent.key || be32(index))
//! child.key   = I[0..32]
//! child.chain = I[32..64]
//! ```
//!
//! One-way: a child reveals nothing about its parent.
//!
//! ## Offsets
//!
//! `index = segment + offset` for *every* segment, `'` or not. With the
//! default offset `m/1` and `m/1'` are the same key. That is how keys
//! derived by earlier releases were produced, so it is kept as is.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::path::DerivationPath;
use super::seed::{chain_code_string, master_key_from_password, ExtendedKey, MasterKey};
use super::HdKeyError;
use crate::config::{ED25519_SEED_KEY, HARDENED_OFFSET, KEY_LENGTH};
use crate::crypto::{hmac_sha512, keccak256, Encoding};
use crate::keypair::{EdKeypair, Ed25519Signer, ExportedKeyPair, Keypair};

/// A password-rooted key tree.
///
/// # Examples
///
/// ```
/// use hd_did::hdkey::HdKey;
///
/// let hd = HdKey::from_password("correct horse battery staple");
/// let (signer, keypair) = hd.derive_key_path("m/0'/1'").unwrap();
/// assert_eq!(&signer.public_key()[..], keypair.public_key());
/// assert!(keypair.did().starts_with("did:key:z"));
/// ```
pub struct HdKey {
    master: MasterKey,
    chain_code: String,
}

impl HdKey {
    /// Derive the master key from `password`.
    pub fn from_password(password: &str) -> Self {
        Self::from_master_key(master_key_from_password(password))
    }

    /// Root a tree at an existing master key.
    pub fn from_master_key(master: MasterKey) -> Self {
        let chain_code = chain_code_string(&master);
        Self { master, chain_code }
    }

    /// The master chain code, base64pad-encoded.
    pub fn chain_code(&self) -> &str {
        &self.chain_code
    }

    /// `true` if `path` is a valid derivation path.
    pub fn is_valid_path(&self, path: &str) -> bool {
        super::path::is_valid_path(path)
    }

    /// Walk `path` from the master key, adding `offset` to every segment.
    ///
    /// The path is validated before any HMAC work is done.
    pub fn derive_extended_key(&self, path: &str, offset: u32) -> Result<ExtendedKey, HdKeyError> {
        let parsed = DerivationPath::parse(path)?;
        let derived = parsed
            .indices(offset)
            .fold(self.master.clone(), |parent, index| {
                trace!(index, "extending key");
                extend_key(&parent, index)
            });
        debug!(path, depth = parsed.depth(), offset, "derived key path");
        Ok(derived)
    }

    /// Derive the keypair at `path` with the default hardened offset.
    pub fn derive_key_path(&self, path: &str) -> Result<(Ed25519Signer, Keypair), HdKeyError> {
        self.derive_key_path_with_offset(path, HARDENED_OFFSET)
    }

    /// Derive the keypair at `path` with an explicit offset.
    ///
    /// The keypair's secret is `key || chain_code` of the derived node. It is
    /// returned non-exportable; use [`export_key_path`](Self::export_key_path)
    /// to get the key material out.
    pub fn derive_key_path_with_offset(
        &self,
        path: &str,
        offset: u32,
    ) -> Result<(Ed25519Signer, Keypair), HdKeyError> {
        let secret = self.derive_extended_key(path, offset)?.to_secret_key();
        signer_and_keypair(secret.as_slice(), false)
    }

    /// Export the keypair at `path` (default offset) as base64pad strings.
    pub fn export_key_path(&self, path: &str) -> Result<ExportedKeyPair, HdKeyError> {
        self.export_key_path_with_offset(path, HARDENED_OFFSET)
    }

    /// Export the keypair at `path` with an explicit offset.
    pub fn export_key_path_with_offset(
        &self,
        path: &str,
        offset: u32,
    ) -> Result<ExportedKeyPair, HdKeyError> {
        let secret = self.derive_extended_key(path, offset)?.to_secret_key();
        Ok(ExportedKeyPair::from_secret_key(secret.as_slice())?)
    }

    /// Signed-key mixing: derive a keypair from the master key and a
    /// caller-supplied hex nonce.
    ///
    /// ```text
    /// digest = Keccak-256(base64pad(master.key) || signed_key)
    /// secret = HMAC-SHA512(key = "ed25519 seed", data = digest)
    /// ```
    ///
    /// The nonce is mixed in as text, exactly as given. This is not a path
    /// derivation and shares nothing with the key tree beyond the master.
    pub fn create_ed_keypair(
        &self,
        signed_key: &str,
    ) -> Result<(Ed25519Signer, Keypair), HdKeyError> {
        let secret = self.mix_signed_key(signed_key)?;
        debug!(nonce_len = signed_key.len(), "derived signed-key keypair");
        signer_and_keypair(secret.as_slice(), false)
    }

    /// Export raw 64-byte secret key material as base64pad strings,
    /// recomputing the public key.
    pub fn export_ed_keypair(secret_key: &[u8]) -> Result<ExportedKeyPair, HdKeyError> {
        Ok(ExportedKeyPair::from_secret_key(secret_key)?)
    }

    fn mix_signed_key(&self, signed_key: &str) -> Result<Zeroizing<[u8; 64]>, HdKeyError> {
        let mut material = Zeroizing::new(
            Encoding::Base64Pad
                .encode(self.master.key())
                .map_err(crate::keypair::KeyError::from)?,
        );
        material.push_str(signed_key);
        let digest = Zeroizing::new(keccak256(material.as_bytes()));
        Ok(Zeroizing::new(hmac_sha512(ED25519_SEED_KEY, &[digest.as_slice()])))
    }
}

impl std::fmt::Debug for HdKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HdKey(chain_code={})", self.chain_code)
    }
}

/// One child-extension step.
pub fn extend_key(parent: &ExtendedKey, index: u32) -> ExtendedKey {
    let mut data = Zeroizing::new([0u8; 1 + KEY_LENGTH + 4]);
    data[1..=KEY_LENGTH].copy_from_slice(parent.key());
    data[1 + KEY_LENGTH..].copy_from_slice(&index.to_be_bytes());

    let i = Zeroizing::new(hmac_sha512(parent.chain_code(), &[data.as_slice()]));
    ExtendedKey::from_hmac_output(&i)
}

fn signer_and_keypair(
    secret: &[u8],
    exportable: bool,
) -> Result<(Ed25519Signer, Keypair), HdKeyError> {
    let keypair = EdKeypair::from_secret_bytes(secret, exportable)?;
    let signer = Ed25519Signer::from(&keypair);
    Ok((signer, Keypair::Ed25519(keypair)))
}
