//! Structured logging setup for processes embedding the vault client.
//!
//! The library itself only emits `tracing` events; hosts that have no
//! subscriber of their own can call [`init_tracing`] once at startup.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext or ciphertext** in any span or log field.
//!   Logical keys, parameter names and KMS key ids are not secret and may be
//!   logged.
//! - `RUST_LOG` overrides the configured level when set.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a JSON-formatted global subscriber filtered at `log_level`.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive or a
/// global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level {log_level:?}"))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}
