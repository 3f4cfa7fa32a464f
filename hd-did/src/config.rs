//! # Constants
//!
//! Every magic number in hd-did lives here. Derivation constants are part of
//! the output format: changing any of them changes every key ever derived
//! from a password, so treat them as frozen.

// ---------------------------------------------------------------------------
// Key Derivation
// ---------------------------------------------------------------------------

/// HMAC key used to turn a 32-byte digest into a master key + chain code.
/// Same domain string SLIP-0010 uses for the Ed25519 curve.
pub const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Offset added to every path segment during derivation.
///
/// Note that it is applied to *every* segment, whether or not the segment
/// carries a `'` marker in the path text. Keys already derived in the wild
/// depend on this, so it stays.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Length of a derived key and of a chain code.
pub const KEY_LENGTH: usize = 32;

/// Length of a chain code. Always equal to [`KEY_LENGTH`].
pub const CHAIN_CODE_LENGTH: usize = 32;

/// Ed25519 secret key length as carried around by this crate:
/// 32-byte seed followed by 32 bytes of trailing material.
pub const SECRET_KEY_LENGTH: usize = 64;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// DID Encoding
// ---------------------------------------------------------------------------

/// `did:key` prefix including the multibase `z` (base58btc) marker.
pub const BASE58_DID_PREFIX: &str = "did:key:z";

/// Multicodec tag for an Ed25519 public key (varint 0xed).
pub const EDWARDS_DID_PREFIX: [u8; 2] = [0xed, 0x01];

// ---------------------------------------------------------------------------
// JWE
// ---------------------------------------------------------------------------

/// Key management algorithm: ECDH-ES with XChaCha20-Poly1305 key wrapping.
pub const JWE_ALG_X25519: &str = "ECDH-ES+XC20PKW";

/// Content encryption algorithm: XChaCha20-Poly1305.
pub const JWE_ENC_XC20P: &str = "XC20P";

/// Content encryption key length.
pub const CEK_LENGTH: usize = 32;

/// XChaCha20-Poly1305 nonce length.
pub const XC20P_IV_LENGTH: usize = 24;

/// Poly1305 tag length.
pub const XC20P_TAG_LENGTH: usize = 16;

/// Key length requested from the Concat KDF, in bits.
pub const KEK_LENGTH_BITS: u32 = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardened_offset_is_top_bit() {
        assert_eq!(HARDENED_OFFSET, 1 << 31);
    }

    #[test]
    fn test_did_prefix_is_base58btc_multibase() {
        assert!(BASE58_DID_PREFIX.starts_with("did:key:"));
        assert!(BASE58_DID_PREFIX.ends_with('z'));
    }

    #[test]
    fn test_lengths_are_consistent() {
        assert_eq!(KEY_LENGTH + CHAIN_CODE_LENGTH, SECRET_KEY_LENGTH);
        assert_eq!(KEK_LENGTH_BITS as usize / 8, CEK_LENGTH);
    }
}
