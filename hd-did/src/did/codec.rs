//! # `did:key` Codec
//!
//! ```text
//! did:key:z<base58btc(multicodec || public_key)>
//! ```
//!
//! `z` is the multibase marker for base58btc; the multicodec tag for an
//! Ed25519 key is `0xed 0x01`, which is why every such DID starts with
//! `did:key:z6Mk`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Did, DidError};
use crate::config::{BASE58_DID_PREFIX, EDWARDS_DID_PREFIX};
use crate::keypair::KeyType;

static DID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"did:([A-Za-z0-9_]+):([A-Za-z0-9_]+)")
        .unwrap_or_else(|e| unreachable!("static DID regex: {e}"))
});

/// Encode `public_key` as a `did:key` string tagged with `key_type`.
pub fn encode_did(public_key: &[u8], key_type: KeyType) -> String {
    did_from_key_bytes(public_key, &key_type.multicodec())
}

/// Encode an Ed25519 public key as `did:key:z6Mk...`.
///
/// # Example
///
/// ```
/// use hd_did::did::{encode_did_key, extract_did_key};
///
/// let key = [7u8; 32];
/// let did = encode_did_key(&key);
/// assert!(did.starts_with("did:key:z6Mk"));
/// assert_eq!(extract_did_key(&did).unwrap(), key);
/// ```
pub fn encode_did_key(public_key: &[u8]) -> String {
    did_from_key_bytes(public_key, &EDWARDS_DID_PREFIX)
}

/// Recover the Ed25519 public key from a `did:key` string.
///
/// # Errors
///
/// - [`DidError::Format`] if `did` does not start with `did:key:z`.
/// - [`DidError::Encoding`] if the remainder is not valid base58btc.
/// - [`DidError::PrefixMismatch`] if the decoded bytes are not tagged as
///   an Ed25519 key.
pub fn extract_did_key(did: &str) -> Result<Vec<u8>, DidError> {
    did_to_bytes(did, &EDWARDS_DID_PREFIX)
}

/// Parse any `did:<method>:<identifier>` string.
///
/// The match is a search, not an anchored parse: anything after the
/// identifier (a path, a fragment) is ignored, and so is anything before
/// the first `did:`.
pub fn parse_did(did: &str) -> Result<Did, DidError> {
    let captures = DID_REGEX
        .captures(did)
        .ok_or_else(|| DidError::InvalidDid(did.to_string()))?;
    Ok(Did {
        method: captures[1].to_string(),
        identifier: captures[2].to_string(),
    })
}

/// `true` if [`parse_did`] accepts `did`.
pub fn is_valid_did(did: &str) -> bool {
    parse_did(did).is_ok()
}

fn did_from_key_bytes(public_key: &[u8], prefix: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(prefix.len() + public_key.len());
    bytes.extend_from_slice(prefix);
    bytes.extend_from_slice(public_key);
    format!("{}{}", BASE58_DID_PREFIX, bs58::encode(bytes).into_string())
}

fn did_to_bytes(did: &str, prefix: &[u8]) -> Result<Vec<u8>, DidError> {
    let encoded = did.strip_prefix(BASE58_DID_PREFIX).ok_or(DidError::Format)?;
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| DidError::Encoding(e.to_string()))?;
    match bytes.strip_prefix(prefix) {
        Some(key) => Ok(key.to_vec()),
        None => Err(DidError::PrefixMismatch {
            expected: hex::encode(prefix),
        }),
    }
}
