//! # Decentralized Identifiers
//!
//! Public keys as `did:key` strings, and the identity that owns one.
//!
//! - [`codec`] — `did:key` encode/decode and the generic `did:` parser.
//! - [`identity`] — [`DidIdentity`], a DID holder that can encrypt to and
//!   decrypt from other DIDs via JWE.
//!
//! ## Standards References
//!
//! - [DID Core v1.0](https://www.w3.org/TR/did-core/)
//! - [The did:key Method](https://w3c-ccg.github.io/did-method-key/)
//! - [Multicodec table](https://github.com/multiformats/multicodec)

pub mod codec;
pub mod identity;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use codec::{encode_did, encode_did_key, extract_did_key, is_valid_did, parse_did};
pub use identity::{CreateJweOptions, DidIdentity, Recipient};

/// Errors from DID encoding and parsing.
#[derive(Debug, Error)]
pub enum DidError {
    /// The string is not a base58btc `did:key`.
    #[error("DID encoding format must be base58btc and start with did:key:z")]
    Format,

    /// The decoded key carries a different multicodec tag.
    #[error("expected multicodec prefix {expected}")]
    PrefixMismatch { expected: String },

    /// The string is not of the form `did:<method>:<identifier>`.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// The base58btc payload could not be decoded.
    #[error("invalid base58btc payload: {0}")]
    Encoding(String),
}

/// A parsed `did:<method>:<identifier>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did {
    pub method: String,
    pub identifier: String,
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.identifier)
    }
}

impl std::str::FromStr for Did {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_did(s)
    }
}
