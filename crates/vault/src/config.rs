//! Configuration loading and validation for the vault client.
//!
//! Values are read from `VAULT_`-prefixed environment variables. Every field
//! has a default, so an empty environment yields a usable configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::client::{DEFAULT_PLAINTEXT_CACHE_SIZE, DEFAULT_PLAINTEXT_TTL};

/// Environment variable prefix (`VAULT_KMS_CACHE_SIZE`, ...).
pub const ENV_PREFIX: &str = "VAULT";

/// Validated vault client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultConfig {
    /// Maximum unwrapped DEKs held in memory.
    #[serde(default = "default_kms_cache_size")]
    pub kms_cache_size: usize,

    /// Seconds an unwrapped DEK stays cached.
    #[serde(default = "default_kms_cache_ttl")]
    pub kms_cache_ttl_secs: u64,

    /// Maximum SSM parameter values held in memory.
    #[serde(default = "default_ssm_cache_size")]
    pub ssm_cache_size: usize,

    /// Seconds an SSM parameter value stays cached.
    #[serde(default = "default_ssm_cache_ttl")]
    pub ssm_cache_ttl_secs: u64,

    /// Maximum decrypted plaintexts held in memory.
    #[serde(default = "default_plaintext_cache_size")]
    pub plaintext_cache_size: usize,

    /// Seconds a decrypted plaintext stays cached. `0` falls back to the
    /// client default.
    #[serde(default = "default_plaintext_cache_ttl")]
    pub plaintext_cache_ttl_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Endpoint override for KMS and SSM (LocalStack, VPC endpoints).
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,
}

fn default_kms_cache_size() -> usize {
    1024
}
fn default_kms_cache_ttl() -> u64 {
    300
}
fn default_ssm_cache_size() -> usize {
    1024
}
fn default_ssm_cache_ttl() -> u64 {
    300
}
fn default_plaintext_cache_size() -> usize {
    DEFAULT_PLAINTEXT_CACHE_SIZE
}
fn default_plaintext_cache_ttl() -> u64 {
    DEFAULT_PLAINTEXT_TTL.as_secs()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kms_cache_size: default_kms_cache_size(),
            kms_cache_ttl_secs: default_kms_cache_ttl(),
            ssm_cache_size: default_ssm_cache_size(),
            ssm_cache_ttl_secs: default_ssm_cache_ttl(),
            plaintext_cache_size: default_plaintext_cache_size(),
            plaintext_cache_ttl_secs: default_plaintext_cache_ttl(),
            log_level: default_log_level(),
            aws_endpoint_url: None,
        }
    }
}

impl VaultConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Config::builder().add_source(environment()))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build configuration from environment")?;

        let c: VaultConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    pub fn validate(&self) -> Result<()> {
        ensure_positive(self.kms_cache_size, "VAULT_KMS_CACHE_SIZE")?;
        ensure_positive(self.ssm_cache_size, "VAULT_SSM_CACHE_SIZE")?;
        ensure_positive(self.plaintext_cache_size, "VAULT_PLAINTEXT_CACHE_SIZE")?;
        if let Some(url) = &self.aws_endpoint_url {
            if url.trim().is_empty() {
                anyhow::bail!("VAULT_AWS_ENDPOINT_URL must not be blank when set");
            }
        }
        Ok(())
    }

    pub fn kms_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.kms_cache_ttl_secs)
    }

    pub fn ssm_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.ssm_cache_ttl_secs)
    }

    pub fn plaintext_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.plaintext_cache_ttl_secs)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn ensure_positive(value: usize, name: &str) -> Result<()> {
    if value == 0 {
        anyhow::bail!("{name} must be > 0");
    }
    Ok(())
}
