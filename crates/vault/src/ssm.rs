//! Externally hosted ciphertext via SSM Parameter Store, memoised.
//!
//! Secrets with `store = aws_ssm` keep their base64 ciphertext in a
//! `SecureString` parameter named after the logical key. The parameter's
//! at-rest encryption is unrelated to the envelope scheme; it is simply
//! requested with decryption enabled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::context::CallContext;
use crate::error::VaultError;

/// Input to [`ParameterService::fetch_parameter`]; mirrors SSM `GetParameter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub name: String,
    pub with_decryption: bool,
}

/// External parameter store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParameterService: Send + Sync {
    /// Return the parameter's string value, or an error if it does not exist.
    async fn fetch_parameter(&self, ctx: &CallContext, request: FetchRequest)
        -> anyhow::Result<String>;
}

/// Memoising front for a [`ParameterService`].
pub struct SsmProvider {
    service: Arc<dyn ParameterService>,
    cache: TtlCache<String>,
}

impl SsmProvider {
    pub fn new(service: Arc<dyn ParameterService>, cache_size: usize, ttl: Duration) -> Self {
        Self {
            service,
            cache: TtlCache::new(cache_size, ttl),
        }
    }

    /// Fetch the value of parameter `name` (the base64 ciphertext).
    ///
    /// # Errors
    ///
    /// [`VaultError::ParameterFetch`] for any service error, including a
    /// missing parameter; [`VaultError::Cancelled`] /
    /// [`VaultError::DeadlineExceeded`] from `ctx`.
    pub async fn get(&self, ctx: &CallContext, name: &str) -> Result<String, VaultError> {
        if let Some(value) = self.cache.get(name) {
            debug!(parameter = name, "parameter cache hit");
            return Ok(value);
        }

        let request = FetchRequest {
            name: name.to_owned(),
            with_decryption: true,
        };
        let value = ctx
            .run("ssm get parameter", async {
                self.service
                    .fetch_parameter(ctx, request)
                    .await
                    .map_err(|source| VaultError::ParameterFetch {
                        name: name.to_owned(),
                        source,
                    })
            })
            .await
            .inspect_err(|e| warn!(parameter = name, error = %e, "parameter fetch failed"))?;

        self.cache.set(name, value.clone());
        Ok(value)
    }
}

impl std::fmt::Debug for SsmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmProvider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
