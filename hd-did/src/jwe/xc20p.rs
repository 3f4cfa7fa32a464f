//! XChaCha20-Poly1305 with a detached tag, the `XC20P` JWE content cipher.
//!
//! Also used, without AAD, to wrap content keys (`XC20PKW`).

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use super::JweError;
use crate::config::{XC20P_IV_LENGTH, XC20P_TAG_LENGTH};

/// Output of [`seal`]: ciphertext with the Poly1305 tag split off.
#[derive(Debug, Clone)]
pub(crate) struct Sealed {
    pub iv: [u8; XC20P_IV_LENGTH],
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt `plaintext` under a fresh random 24-byte IV.
pub(crate) fn seal(key: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Sealed, JweError> {
    let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| JweError::EncryptionFailed)?;

    let mut iv = [0u8; XC20P_IV_LENGTH];
    OsRng.fill_bytes(&mut iv);

    let mut ciphertext = cipher
        .encrypt(XNonce::from_slice(&iv), Payload { msg: plaintext, aad })
        .map_err(|_| JweError::EncryptionFailed)?;
    let tag = ciphertext.split_off(ciphertext.len() - XC20P_TAG_LENGTH);

    Ok(Sealed {
        iv,
        ciphertext,
        tag,
    })
}

/// Decrypt and authenticate. `None` on any failure, including bad lengths.
pub(crate) fn open(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    aad: &[u8],
) -> Option<Vec<u8>> {
    if iv.len() != XC20P_IV_LENGTH || tag.len() != XC20P_TAG_LENGTH {
        return None;
    }
    let cipher = XChaCha20Poly1305::new_from_slice(key).ok()?;

    let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    cipher
        .decrypt(XNonce::from_slice(iv), Payload { msg: &sealed, aad })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn test_seal_open_roundtrip() {
        let sealed = seal(&KEY, b"attack at dawn", b"header").unwrap();
        assert_eq!(sealed.tag.len(), 16);
        assert_eq!(sealed.ciphertext.len(), 14);
        let opened = open(&KEY, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"header").unwrap();
        assert_eq!(opened, b"attack at dawn");
    }

    #[test]
    fn test_empty_plaintext() {
        let sealed = seal(&KEY, b"", b"").unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert_eq!(
            open(&KEY, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"").unwrap(),
            b""
        );
    }

    #[test]
    fn test_wrong_aad_fails() {
        let sealed = seal(&KEY, b"secret", b"right").unwrap();
        assert!(open(&KEY, &sealed.iv, &sealed.ciphertext, &sealed.tag, b"wrong").is_none());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(&KEY, b"secret", b"").unwrap();
        assert!(open(&[0x43; 32], &sealed.iv, &sealed.ciphertext, &sealed.tag, b"").is_none());
    }

    #[test]
    fn test_bad_lengths_fail_without_panicking() {
        let sealed = seal(&KEY, b"secret", b"").unwrap();
        assert!(open(&KEY, &sealed.iv[..12], &sealed.ciphertext, &sealed.tag, b"").is_none());
        assert!(open(&KEY, &sealed.iv, &sealed.ciphertext, &sealed.tag[..8], b"").is_none());
        assert!(open(&KEY[..16], &sealed.iv, &sealed.ciphertext, &sealed.tag, b"").is_none());
    }

    #[test]
    fn test_unique_ivs() {
        let a = seal(&KEY, b"m", b"").unwrap();
        let b = seal(&KEY, b"m", b"").unwrap();
        assert_ne!(a.iv, b.iv);
    }
}
