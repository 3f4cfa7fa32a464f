//! # Hierarchical Deterministic Keys
//!
//! Everything that turns a password into Ed25519 key material.
//!
//! The tree is layered:
//!
//! 1. **Seed** — Keccak-256 of the password, stretched by HMAC-SHA512 into
//!    a 32-byte master key and a 32-byte chain code.
//! 2. **Path** — `m/0'/1'/...` strings parsed into child indices.
//! 3. **Tree** — an HMAC-SHA512 cascade, one step per path segment, keyed by
//!    the parent chain code.
//! 4. **Signed-key mixing** — a second, unrelated way to get a child key
//!    from the master: hash the master key together with a caller-supplied
//!    hex nonce.
//!
//! The two derivations are kept as separately named operations on
//! [`HdKey`]. A nonce is not a path and a path is not a nonce.

pub mod key;
pub mod path;
pub mod seed;

use thiserror::Error;

use crate::keypair::KeyError;

pub use key::HdKey;
pub use path::{is_valid_path, DerivationPath, Segment};
pub use seed::{master_key_from_password, ExtendedKey, MasterKey};

/// Errors from key-tree operations.
#[derive(Debug, Error)]
pub enum HdKeyError {
    /// The path failed the grammar or a segment is not a `u32`.
    #[error("invalid derivation path: {0:?}")]
    InvalidPath(String),

    /// Building the keypair from derived bytes failed.
    #[error(transparent)]
    Key(#[from] KeyError),
}
