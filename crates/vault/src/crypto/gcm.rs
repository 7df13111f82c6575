//! AES-256-GCM authenticated decryption of stored secrets.
//!
//! Records keep the ciphertext, the 96-bit IV and the 128-bit tag in separate
//! base64 columns. The AEAD primitive expects the tag appended to the
//! ciphertext, so [`decrypt`] rebuilds `ciphertext || tag` before opening.
//!
//! Size checks on the DEK, IV and tag run before the primitive is invoked so
//! that malformed records produce a descriptive error instead of an opaque
//! authentication failure.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Base64 column that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ciphertext,
    Iv,
    Tag,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Ciphertext => "ciphertext",
            Field::Iv => "iv",
            Field::Tag => "tag",
        })
    }
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// A base64 column could not be decoded.
    #[error("{field} base64")]
    Decode {
        field: Field,
        #[source]
        source: base64::DecodeError,
    },

    /// The DEK is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid DEK length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The IV is the wrong length (must be [`NONCE_LEN`] bytes).
    #[error("bad iv size: expected {NONCE_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    /// The tag is the wrong length (must be [`TAG_LEN`] bytes).
    #[error("bad tag size: expected {TAG_LEN} bytes, got {0}")]
    InvalidTagLength(usize),

    /// Wrong key, wrong AAD, or tampered ciphertext/tag. Deliberately carries
    /// no detail.
    #[error("gcm open: authentication failed")]
    AuthenticationFailed,
}

/// Decrypt one stored secret.
///
/// # Errors
///
/// - [`CipherError::Decode`] naming the first column that is not valid base64.
/// - [`CipherError::InvalidKeyLength`], [`CipherError::InvalidIvLength`],
///   [`CipherError::InvalidTagLength`] for size violations.
/// - [`CipherError::AuthenticationFailed`] if the tag does not verify. No
///   plaintext is returned in that case.
pub fn decrypt(
    dek: &[u8],
    ciphertext_b64: &str,
    iv_b64: &str,
    tag_b64: &str,
    aad: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let ciphertext = decode(Field::Ciphertext, ciphertext_b64)?;
    let iv = decode(Field::Iv, iv_b64)?;
    let tag = decode(Field::Tag, tag_b64)?;

    let cipher = build_cipher(dek)?;

    if iv.len() != NONCE_LEN {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }
    if tag.len() != TAG_LEN {
        return Err(CipherError::InvalidTagLength(tag.len()));
    }

    let mut sealed = ciphertext;
    sealed.extend_from_slice(&tag);

    cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad,
            },
        )
        .map_err(|_| CipherError::AuthenticationFailed)
}

fn decode(field: Field, value: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(value)
        .map_err(|source| CipherError::Decode { field, source })
}

fn build_cipher(dek: &[u8]) -> Result<Aes256Gcm, CipherError> {
    if dek.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(dek.len()));
    }
    Aes256Gcm::new_from_slice(dek).map_err(|_| CipherError::InvalidKeyLength(dek.len()))
}
