//! Canonical logical-key layout.
//!
//! ```text
//! /<domain>/<service>/<store>/<secret_id>/<tenant_id>/<environment>
//! ```
//!
//! The logical key is bound into every ciphertext via the AAD, so the layout
//! must not change for existing secrets.

use uuid::Uuid;

use crate::record::{Environment, Store};

/// Domain segment used when the caller passes an empty one.
pub const DEFAULT_DOMAIN: &str = "ds";

/// Service segment used when the caller passes an empty one.
pub const DEFAULT_SERVICE: &str = "vault";

/// Compose the logical key for a secret.
///
/// Empty `domain` / `service` fall back to [`DEFAULT_DOMAIN`] /
/// [`DEFAULT_SERVICE`].
pub fn make_key(
    secret_id: Uuid,
    tenant_id: Uuid,
    store: Store,
    environment: Environment,
    domain: &str,
    service: &str,
) -> String {
    let domain = if domain.is_empty() { DEFAULT_DOMAIN } else { domain };
    let service = if service.is_empty() { DEFAULT_SERVICE } else { service };
    format!("/{domain}/{service}/{store}/{secret_id}/{tenant_id}/{environment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid) {
        (
            Uuid::parse_str("aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa").unwrap(),
            Uuid::parse_str("bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb").unwrap(),
        )
    }

    #[test]
    fn composes_all_segments() {
        let (secret, tenant) = ids();
        let key = make_key(secret, tenant, Store::AwsSsm, Environment::Prod, "billing", "api");
        assert_eq!(
            key,
            "/billing/api/aws_ssm/aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa/bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb/prod"
        );
    }

    #[test]
    fn empty_domain_and_service_use_defaults() {
        let (secret, tenant) = ids();
        let key = make_key(secret, tenant, Store::DsVault, Environment::Dev, "", "");
        assert!(key.starts_with("/ds/vault/ds_vault/"));
        assert!(key.ends_with("/dev"));
    }
}
