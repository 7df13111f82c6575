//! DEK unwrap via the external key service, memoised.
//!
//! Unwrapping is a pure function of (ciphertext blob, encryption context, key
//! id) from KMS's point of view, so the plaintext DEK is cached under exactly
//! that tuple. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::binding::EncryptionContext;
use crate::cache::TtlCache;
use crate::context::CallContext;
use crate::crypto::DekBytes;
use crate::error::VaultError;

/// Input to [`KeyUnwrapService::unwrap_dek`]; mirrors KMS `Decrypt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapRequest {
    /// Raw (base64-decoded) wrapped DEK.
    pub ciphertext_blob: Vec<u8>,
    /// `None` when the context is empty; never sent as an empty object.
    pub encryption_context: Option<EncryptionContext>,
    /// `None` when the record has no key id.
    pub key_id: Option<String>,
}

/// External key-encryption-key service.
///
/// Implementations must reject a request whose encryption context differs from
/// the one supplied at wrap time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyUnwrapService: Send + Sync {
    /// Return the plaintext DEK for `request`.
    async fn unwrap_dek(&self, ctx: &CallContext, request: UnwrapRequest)
        -> anyhow::Result<Vec<u8>>;
}

/// Memoising front for a [`KeyUnwrapService`].
pub struct KmsProvider {
    service: Arc<dyn KeyUnwrapService>,
    cache: TtlCache<DekBytes>,
}

impl KmsProvider {
    /// Wrap `service` with a cache of `cache_size` entries living `ttl` each.
    pub fn new(service: Arc<dyn KeyUnwrapService>, cache_size: usize, ttl: Duration) -> Self {
        Self {
            service,
            cache: TtlCache::new(cache_size, ttl),
        }
    }

    /// Unwrap the base64 `wrapped_b64` DEK under `context` and `key_id`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::WrappedDekDecode`] if `wrapped_b64` is not base64.
    /// - [`VaultError::KeyUnwrap`] if the service fails.
    /// - [`VaultError::Cancelled`] / [`VaultError::DeadlineExceeded`] from `ctx`.
    pub async fn decrypt_dek(
        &self,
        ctx: &CallContext,
        wrapped_b64: &str,
        context: &EncryptionContext,
        key_id: &str,
    ) -> Result<DekBytes, VaultError> {
        let cache_key = cache_key(wrapped_b64, context, key_id)?;
        if let Some(dek) = self.cache.get(&cache_key) {
            debug!(kek_key_id = key_id, "unwrap cache hit");
            return Ok(dek);
        }

        let ciphertext_blob = STANDARD
            .decode(wrapped_b64)
            .map_err(VaultError::WrappedDekDecode)?;
        let request = UnwrapRequest {
            ciphertext_blob,
            encryption_context: (!context.is_empty()).then(|| context.clone()),
            key_id: (!key_id.is_empty()).then(|| key_id.to_owned()),
        };

        let plaintext = ctx
            .run("kms unwrap", async {
                self.service
                    .unwrap_dek(ctx, request)
                    .await
                    .map_err(VaultError::KeyUnwrap)
            })
            .await
            .inspect_err(|e| warn!(kek_key_id = key_id, error = %e, "DEK unwrap failed"))?;

        let dek = DekBytes::new(plaintext);
        self.cache.set(cache_key, dek.clone());
        debug!(kek_key_id = key_id, "DEK unwrapped and cached");
        Ok(dek)
    }
}

impl std::fmt::Debug for KmsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KmsProvider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Stable JSON for `context`: keys sorted, strings JSON-escaped, `{}` when empty.
pub fn canonical_context(context: &EncryptionContext) -> Result<String, VaultError> {
    // BTreeMap serialises in key order.
    serde_json::to_string(context).map_err(VaultError::ContextEncoding)
}

fn cache_key(
    wrapped_b64: &str,
    context: &EncryptionContext,
    key_id: &str,
) -> Result<String, VaultError> {
    Ok(format!(
        "{wrapped_b64}|{}|{key_id}",
        canonical_context(context)?
    ))
}
