//! # Text Encodings
//!
//! Keys cross API boundaries as strings. [`Encoding`] names the handful of
//! byte-to-text encodings the keypair codec accepts and produces, using the
//! same names the multibase table uses (`base64pad`, `base58btc`, ...).
//!
//! Base64 variants come from the `base64` crate, base58btc from `bs58`
//! (Bitcoin alphabet), base16 from `hex`.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use thiserror::Error;

/// Errors from encoding or decoding text.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid {encoding} input: {reason}")]
    InvalidInput {
        encoding: Encoding,
        reason: String,
    },
}

/// Supported byte/text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// RFC 4648 base64 with `=` padding. The default for key export.
    #[default]
    Base64Pad,
    /// RFC 4648 base64 without padding.
    Base64,
    /// RFC 4648 URL-safe base64 without padding. Used for JWS/JWE fields.
    Base64Url,
    /// Base58 with the Bitcoin alphabet.
    Base58Btc,
    /// Lowercase hex.
    Base16,
    /// Raw UTF-8. Decoding fails on invalid sequences.
    Utf8,
}

impl Encoding {
    /// Canonical multibase-style name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Base64Pad => "base64pad",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
            Encoding::Base58Btc => "base58btc",
            Encoding::Base16 => "base16",
            Encoding::Utf8 => "utf8",
        }
    }

    /// Encode `bytes` as text.
    pub fn encode(self, bytes: &[u8]) -> Result<String, EncodingError> {
        Ok(match self {
            Encoding::Base64Pad => STANDARD.encode(bytes),
            Encoding::Base64 => STANDARD_NO_PAD.encode(bytes),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
            Encoding::Base58Btc => bs58::encode(bytes).into_string(),
            Encoding::Base16 => hex::encode(bytes),
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                EncodingError::InvalidInput {
                    encoding: self,
                    reason: e.to_string(),
                }
            })?,
        })
    }

    /// Decode `text` back into bytes.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, EncodingError> {
        let invalid = |reason: String| EncodingError::InvalidInput {
            encoding: self,
            reason,
        };
        match self {
            Encoding::Base64Pad => STANDARD.decode(text).map_err(|e| invalid(e.to_string())),
            Encoding::Base64 => STANDARD_NO_PAD
                .decode(text)
                .map_err(|e| invalid(e.to_string())),
            Encoding::Base64Url => URL_SAFE_NO_PAD
                .decode(text)
                .map_err(|e| invalid(e.to_string())),
            Encoding::Base58Btc => bs58::decode(text)
                .into_vec()
                .map_err(|e| invalid(e.to_string())),
            Encoding::Base16 => hex::decode(text).map_err(|e| invalid(e.to_string())),
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    /// Parse an encoding name. `hex` is accepted as an alias for `base16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base64pad" => Ok(Encoding::Base64Pad),
            "base64" => Ok(Encoding::Base64),
            "base64url" => Ok(Encoding::Base64Url),
            "base58btc" => Ok(Encoding::Base58Btc),
            "base16" | "hex" => Ok(Encoding::Base16),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            other => Err(EncodingError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Encode with URL-safe unpadded base64. Shorthand for the JWE module.
pub(crate) fn b64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe unpadded base64.
pub(crate) fn b64url_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    Encoding::Base64Url.decode(text)
}
