//! Binding data: the AES-GCM AAD and the KMS encryption context.
//!
//! Both forms are derived from the same `(tenant_id, logical_key)` pair in a
//! single call. The AAD layout is bound into every stored ciphertext and must
//! never change:
//!
//! ```text
//! tenant:<tenant-id>|key:<logical-key>
//! ```

use std::collections::BTreeMap;

use uuid::Uuid;

/// KMS encryption context. Ordered so that iteration is stable.
pub type EncryptionContext = BTreeMap<String, String>;

/// Encryption-context entry carrying the tenant id.
pub const CONTEXT_TENANT_ID: &str = "tenant_id";

/// Encryption-context entry carrying the logical key.
pub const CONTEXT_KEY: &str = "key";

/// AAD bytes and encryption context for one secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingData {
    pub aad: Vec<u8>,
    pub context: EncryptionContext,
}

/// Derive the binding data for `logical_key` owned by `tenant_id`.
pub fn build(tenant_id: &Uuid, logical_key: &str) -> BindingData {
    let tenant = tenant_id.to_string();
    let aad = format!("tenant:{tenant}|key:{logical_key}").into_bytes();

    let mut context = EncryptionContext::new();
    context.insert(CONTEXT_TENANT_ID.to_owned(), tenant);
    context.insert(CONTEXT_KEY.to_owned(), logical_key.to_owned());

    BindingData { aad, context }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> Uuid {
        Uuid::parse_str("bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb").unwrap()
    }

    #[test]
    fn aad_layout_is_exact() {
        let b = build(&tenant(), "/ds/vault/ds_vault/s/t/dev");
        assert_eq!(
            b.aad,
            b"tenant:bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb|key:/ds/vault/ds_vault/s/t/dev".to_vec()
        );
    }

    #[test]
    fn context_mirrors_aad_inputs() {
        let b = build(&tenant(), "some/key");
        assert_eq!(b.context.len(), 2);
        assert_eq!(
            b.context[CONTEXT_TENANT_ID],
            "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb"
        );
        assert_eq!(b.context[CONTEXT_KEY], "some/key");
    }

    #[test]
    fn deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(build(&id, "k"), build(&id, "k"));
    }

    #[test]
    fn no_escaping_of_delimiters() {
        let b = build(&tenant(), "a|key:b");
        let aad = String::from_utf8(b.aad).unwrap();
        assert!(aad.ends_with("|key:a|key:b"));
    }

    #[test]
    fn different_tenants_differ() {
        let a = build(&Uuid::new_v4(), "k");
        let b = build(&Uuid::new_v4(), "k");
        assert_ne!(a.aad, b.aad);
        assert_ne!(a.context, b.context);
    }
}
