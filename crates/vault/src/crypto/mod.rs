//! AES-256-GCM decryption primitives and DEK handling.
//!
//! This module is free of AWS and caching concerns. Stored ciphertext is split
//! into three base64 columns (ciphertext, IV, tag); [`gcm::decrypt`]
//! reassembles `ciphertext || tag` before opening.

pub mod dek;
pub mod gcm;

pub use dek::DekBytes;
pub use gcm::{decrypt, CipherError, Field, KEY_LEN, NONCE_LEN, TAG_LEN};
