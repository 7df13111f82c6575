//! [`DekBytes`]: plaintext Data Encryption Key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Unwrapped DEK bytes as returned by KMS.
///
/// The length is not checked here; [`decrypt`](super::decrypt) rejects
/// anything other than [`KEY_LEN`](super::KEY_LEN) bytes. The buffer is wiped
/// when dropped, including copies evicted from the unwrap cache.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DekBytes(Vec<u8>);

impl DekBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for DekBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl std::fmt::Debug for DekBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("DekBytes([REDACTED])")
    }
}
