//! # Hashing Utilities
//!
//! The three digests hd-did composes, each a thin wrapper over a RustCrypto
//! crate:
//!
//! - **Keccak-256** — password and signed-key stretching. Note: Keccak, not
//!   NIST SHA3-256. The padding byte differs and so does every output.
//! - **HMAC-SHA512** — master key generation and child extension.
//! - **SHA-256** — the Concat KDF inside the JWE key agreement.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

type HmacSha512 = Hmac<Sha512>;

/// Compute the Keccak-256 digest of `data`.
///
/// # Example
///
/// ```
/// use hd_did::crypto::keccak256;
///
/// let digest = keccak256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute `HMAC-SHA512(key, data)` over the concatenation of `data` parts.
///
/// Taking the message in parts saves callers from building a temporary
/// buffer that would then hold key material.
pub fn hmac_sha512(key: &[u8], data: &[&[u8]]) -> [u8; 64] {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    for part in data {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// Compute the SHA-256 digest over the concatenation of `data` parts.
pub fn sha256(data: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in data {
        hasher.update(part);
    }
    hasher.finalize().into()
}
