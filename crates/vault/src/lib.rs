//! `envelope-vault`: resolve vault secrets through envelope decryption.
//!
//! Each secret is AES-256-GCM ciphertext under its own DEK; the DEK is wrapped
//! by a KMS key and stored next to the ciphertext material in the secret's
//! record. [`SecretClient::get_secret`] loads the record, unwraps the DEK,
//! sources the ciphertext (from the record or from SSM Parameter Store) and
//! decrypts it, with the AAD and KMS encryption context both bound to
//! `(tenant_id, logical key)`.
//!
//! Three independent [`TtlCache`] instances keep external calls down:
//!
//! | cache      | owner           | key                                   |
//! |------------|-----------------|---------------------------------------|
//! | unwrap     | [`KmsProvider`] | wrapped DEK + canonical context + key id |
//! | fetch      | [`SsmProvider`] | parameter name                        |
//! | plaintext  | [`SecretClient`]| logical key                           |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use envelope_vault::{aws::AwsClients, CallContext, InMemorySecretRepository, SecretClient, VaultConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cfg = VaultConfig::from_env()?;
//! let aws = AwsClients::init(cfg.aws_endpoint_url.as_deref()).await;
//! let repo = Arc::new(InMemorySecretRepository::new());
//! let client = SecretClient::from_config(&cfg, repo, Arc::new(aws.kms), Arc::new(aws.ssm));
//! let ctx = CallContext::background().with_timeout(std::time::Duration::from_secs(5));
//! let secret = client.get_secret(&ctx, "/ds/vault/aws_ssm/<secret>/<tenant>/prod").await?;
//! # let _ = secret;
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod binding;
pub mod cache;
pub mod client;
pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod kms;
pub mod repository;
pub mod ssm;
pub mod telemetry;

pub use binding::{BindingData, EncryptionContext};
pub use cache::TtlCache;
pub use client::SecretClient;
pub use crate::config::VaultConfig;
pub use context::CallContext;
pub use crypto::{CipherError, DekBytes};
pub use error::VaultError;
pub use kms::{KeyUnwrapService, KmsProvider, UnwrapRequest};
pub use repository::{InMemorySecretRepository, SecretRepository};
pub use ssm::{FetchRequest, ParameterService, SsmProvider};
pub use vault_common::{make_key, Environment, SecretRecord, Status, Store};
