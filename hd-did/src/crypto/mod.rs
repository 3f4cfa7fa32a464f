//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over the audited crates hd-did composes. Nothing in
//! here implements a primitive; it only fixes the shapes the rest of the
//! crate passes around.
//!
//! - **Keccak-256** (`sha3`) for password and signed-key stretching.
//! - **HMAC-SHA512** (`hmac` + `sha2`) for the key tree.
//! - **SHA-256** (`sha2`) for the JWE Concat KDF.
//! - **Text encodings** (`base64`, `bs58`, `hex`) for keys and DIDs.

pub mod encoding;
pub mod hash;

pub use encoding::{Encoding, EncodingError};
pub use hash::{hmac_sha512, keccak256, sha256};
