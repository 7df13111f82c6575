//! Pipeline error type.

use thiserror::Error;

use crate::crypto::CipherError;

/// Errors surfaced by [`SecretClient`](crate::SecretClient) and the providers.
///
/// Each collaborator failure keeps its own variant so callers can tell a
/// missing record from a KMS outage from a tampered ciphertext. Nothing here
/// is ever cached.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The repository has no record for the key.
    #[error("secret not found for key {key:?}")]
    NotFound { key: String },

    /// The repository lookup itself failed.
    #[error("secret repository lookup failed")]
    Repository(#[source] anyhow::Error),

    /// The record's `wrapped_dek` is not valid base64.
    #[error("wrapped_dek base64")]
    WrappedDekDecode(#[source] base64::DecodeError),

    /// The encryption context could not be serialised for the cache key.
    #[error("encryption context encoding")]
    ContextEncoding(#[source] serde_json::Error),

    /// KMS refused or failed to unwrap the DEK.
    #[error("KMS decrypt failed")]
    KeyUnwrap(#[source] anyhow::Error),

    /// SSM could not return the ciphertext parameter.
    #[error("SSM get parameter {name:?} failed")]
    ParameterFetch {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Decoding, size validation, or authenticated decryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The caller cancelled the call.
    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    /// The caller's deadline passed before `operation` finished.
    #[error("{operation} deadline exceeded")]
    DeadlineExceeded { operation: &'static str },
}

impl VaultError {
    /// Returns `true` for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }

    /// Returns `true` when the ciphertext failed authentication.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, VaultError::Cipher(CipherError::AuthenticationFailed))
    }
}
