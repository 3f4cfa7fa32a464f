//! Password to master key.
//!
//! ```text
//! digest     = Keccak-256(password)
//! I          = HMAC-SHA512(key = "ed25519 seed", data = digest)
//! key        = I[0..32]
//! chain_code = I[32..64]
//! ```

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{CHAIN_CODE_LENGTH, ED25519_SEED_KEY, KEY_LENGTH};
use crate::crypto::{hmac_sha512, keccak256, Encoding};

/// A 32-byte key with its 32-byte chain code.
///
/// Used both for the master key and for every node of the key tree.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; KEY_LENGTH],
    chain_code: [u8; CHAIN_CODE_LENGTH],
}

/// The root of a key tree. Same shape as any other node.
pub type MasterKey = ExtendedKey;

impl ExtendedKey {
    /// Assemble from raw halves.
    pub fn new(key: [u8; KEY_LENGTH], chain_code: [u8; CHAIN_CODE_LENGTH]) -> Self {
        Self { key, chain_code }
    }

    /// Split a 64-byte HMAC output into `IL` (key) and `IR` (chain code).
    pub(crate) fn from_hmac_output(i: &[u8; 64]) -> Self {
        let mut key = [0u8; KEY_LENGTH];
        let mut chain_code = [0u8; CHAIN_CODE_LENGTH];
        key.copy_from_slice(&i[..KEY_LENGTH]);
        chain_code.copy_from_slice(&i[KEY_LENGTH..]);
        Self { key, chain_code }
    }

    /// The key half.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// The chain code half.
    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_LENGTH] {
        &self.chain_code
    }

    /// `key || chain_code`, the 64-byte secret key a keypair is built from.
    pub fn to_secret_key(&self) -> zeroize::Zeroizing<[u8; 64]> {
        let mut out = zeroize::Zeroizing::new([0u8; 64]);
        out[..KEY_LENGTH].copy_from_slice(&self.key);
        out[KEY_LENGTH..].copy_from_slice(&self.chain_code);
        out
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The chain code alone cannot derive keys, so it is safe to show.
        write!(f, "ExtendedKey(chain_code={})", hex::encode(self.chain_code))
    }
}

/// Derive the master key for `password`.
///
/// Deterministic and infallible: the same password always gives the same
/// master key.
pub fn master_key_from_password(password: &str) -> MasterKey {
    let digest = keccak256(password.as_bytes());
    let i = hmac_sha512(ED25519_SEED_KEY, &[&digest]);
    ExtendedKey::from_hmac_output(&i)
}

/// Base64pad rendering of a chain code, for display.
pub fn chain_code_string(master: &MasterKey) -> String {
    // base64pad never fails on arbitrary bytes.
    Encoding::Base64Pad
        .encode(master.chain_code())
        .unwrap_or_default()
}
