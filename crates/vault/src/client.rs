//! [`SecretClient`]: resolve a logical key to decrypted plaintext.
//!
//! # Flow
//!
//! 1. Plaintext cache lookup by key; a hit returns without any external call.
//! 2. Load the [`SecretRecord`] from the repository. `None` is
//!    [`VaultError::NotFound`].
//! 3. Derive AAD and encryption context from `(tenant_id, key)`.
//! 4. Unwrap the DEK through [`KmsProvider`].
//! 5. Source the ciphertext: SSM for [`Store::AwsSsm`], the record's `value`
//!    for [`Store::DsVault`].
//! 6. AES-256-GCM decrypt with the record's IV and tag.
//! 7. Cache the plaintext under the key and return it.
//!
//! Any failure in steps 2–6 aborts without caching.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use vault_common::{SecretRecord, Store};
use zeroize::Zeroizing;

use crate::binding;
use crate::cache::TtlCache;
use crate::config::VaultConfig;
use crate::context::CallContext;
use crate::crypto;
use crate::error::VaultError;
use crate::kms::{KeyUnwrapService, KmsProvider};
use crate::repository::SecretRepository;
use crate::ssm::{ParameterService, SsmProvider};

/// Default plaintext cache capacity.
pub const DEFAULT_PLAINTEXT_CACHE_SIZE: usize = 4096;

/// Plaintext TTL substituted when the configured one rounds to zero seconds.
pub const DEFAULT_PLAINTEXT_TTL: Duration = Duration::from_secs(60);

/// Envelope-decrypting secret client.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and the caches are
/// internally synchronised.
pub struct SecretClient {
    repo: Arc<dyn SecretRepository>,
    kms: Arc<KmsProvider>,
    ssm: Arc<SsmProvider>,
    plaintext_cache: TtlCache<Zeroizing<Vec<u8>>>,
}

impl SecretClient {
    /// Build a client over an existing repository and providers.
    ///
    /// A `plaintext_ttl` under one second is replaced with
    /// [`DEFAULT_PLAINTEXT_TTL`] rather than disabling the cache.
    pub fn new(
        repo: Arc<dyn SecretRepository>,
        kms: Arc<KmsProvider>,
        ssm: Arc<SsmProvider>,
        plaintext_cache_size: usize,
        plaintext_ttl: Duration,
    ) -> Self {
        let plaintext_ttl = if plaintext_ttl.as_secs() == 0 {
            DEFAULT_PLAINTEXT_TTL
        } else {
            plaintext_ttl
        };
        Self {
            repo,
            kms,
            ssm,
            plaintext_cache: TtlCache::new(plaintext_cache_size, plaintext_ttl),
        }
    }

    /// Build the providers and client from `cfg`.
    pub fn from_config(
        cfg: &VaultConfig,
        repo: Arc<dyn SecretRepository>,
        key_service: Arc<dyn KeyUnwrapService>,
        parameter_service: Arc<dyn ParameterService>,
    ) -> Self {
        let kms = KmsProvider::new(key_service, cfg.kms_cache_size, cfg.kms_cache_ttl());
        let ssm = SsmProvider::new(parameter_service, cfg.ssm_cache_size, cfg.ssm_cache_ttl());
        Self::new(
            repo,
            Arc::new(kms),
            Arc::new(ssm),
            cfg.plaintext_cache_size,
            cfg.plaintext_cache_ttl(),
        )
    }

    /// Return the decrypted plaintext for logical key `key`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotFound`] if the repository has no record.
    /// - [`VaultError::Repository`], [`VaultError::KeyUnwrap`],
    ///   [`VaultError::ParameterFetch`] for collaborator failures.
    /// - [`VaultError::WrappedDekDecode`] or [`VaultError::Cipher`] for
    ///   malformed records and authentication failures.
    /// - [`VaultError::Cancelled`] / [`VaultError::DeadlineExceeded`] from `ctx`.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn get_secret(&self, ctx: &CallContext, key: &str) -> Result<Vec<u8>, VaultError> {
        if let Some(plaintext) = self.plaintext_cache.get(key) {
            debug!("plaintext cache hit");
            return Ok(plaintext.to_vec());
        }

        let record = self.load_record(ctx, key).await?;
        let binding = binding::build(&record.tenant_id, &record.key);

        let dek = self
            .kms
            .decrypt_dek(ctx, &record.wrapped_dek, &binding.context, &record.kek_key_id)
            .await?;

        let ciphertext = match record.store {
            Store::AwsSsm => Cow::Owned(self.ssm.get(ctx, &record.key).await?),
            Store::DsVault => Cow::Borrowed(record.value.as_str()),
        };

        let plaintext = crypto::decrypt(
            dek.as_bytes(),
            &ciphertext,
            &record.iv,
            &record.tag,
            &binding.aad,
        )?;

        self.plaintext_cache.set(key, Zeroizing::new(plaintext.clone()));
        debug!(store = %record.store, "secret decrypted and cached");
        Ok(plaintext)
    }

    async fn load_record(&self, ctx: &CallContext, key: &str) -> Result<SecretRecord, VaultError> {
        ctx.run("repository get_secret", async {
            self.repo
                .get_secret(ctx, key)
                .await
                .map_err(VaultError::Repository)
        })
        .await?
        .ok_or_else(|| VaultError::NotFound {
            key: key.to_owned(),
        })
    }
}

impl std::fmt::Debug for SecretClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretClient")
            .field("kms", &self.kms)
            .field("ssm", &self.ssm)
            .field("plaintext_cache", &self.plaintext_cache)
            .finish_non_exhaustive()
    }
}
