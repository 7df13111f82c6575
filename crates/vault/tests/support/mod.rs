//! Deterministic collaborators and sealing helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use envelope_vault::{
    CallContext, EncryptionContext, FetchRequest, KeyUnwrapService, KmsProvider, ParameterService,
    SecretClient, SecretRecord, SecretRepository, SsmProvider, UnwrapRequest,
};

pub fn b64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Base64 `(iv, ciphertext, tag)` for `plaintext` under `dek` and `aad`.
pub fn encrypt_with_dek(dek: &[u8], plaintext: &[u8], aad: &[u8]) -> (String, String, String) {
    let iv = random_bytes(12);
    let mut sealed = Aes256Gcm::new_from_slice(dek)
        .unwrap()
        .encrypt(Nonce::from_slice(&iv), Payload { msg: plaintext, aad })
        .unwrap();
    let tag = sealed.split_off(sealed.len() - 16);
    (b64(iv), b64(sealed), b64(tag))
}

// ---------------------------------------------------------------------------
// KMS
// ---------------------------------------------------------------------------

/// Returns `plaintext` and rejects requests that do not match expectations.
#[derive(Default)]
pub struct FakeKms {
    pub plaintext: Vec<u8>,
    pub expect_context: Option<EncryptionContext>,
    pub expect_key_id: Option<String>,
    pub fail_with: Option<String>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<UnwrapRequest>>,
}

impl FakeKms {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyUnwrapService for FakeKms {
    async fn unwrap_dek(
        &self,
        _ctx: &CallContext,
        request: UnwrapRequest,
    ) -> anyhow::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(msg) = &self.fail_with {
            anyhow::bail!("{msg}");
        }
        if let Some(expected) = &self.expect_key_id {
            if request.key_id.as_ref() != Some(expected) {
                anyhow::bail!("unexpected KeyId");
            }
        }
        if let Some(expected) = &self.expect_context {
            if request.encryption_context.as_ref() != Some(expected) {
                anyhow::bail!("InvalidCiphertextException: unexpected EncryptionContext");
            }
        }
        Ok(self.plaintext.clone())
    }
}

// ---------------------------------------------------------------------------
// SSM
// ---------------------------------------------------------------------------

/// Parameter name -> value map.
#[derive(Default)]
pub struct FakeSsm {
    pub values: HashMap<String, String>,
    pub calls: AtomicUsize,
    pub saw_without_decryption: Mutex<bool>,
}

impl FakeSsm {
    pub fn with_value(name: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(name.to_owned(), value.to_owned());
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterService for FakeSsm {
    async fn fetch_parameter(
        &self,
        _ctx: &CallContext,
        request: FetchRequest,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !request.with_decryption {
            *self.saw_without_decryption.lock().unwrap() = true;
        }
        self.values
            .get(&request.name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("ParameterNotFound: {}", request.name))
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Serves one record by key, optionally after a delay.
#[derive(Default)]
pub struct StubRepo {
    pub record: Option<SecretRecord>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubRepo {
    pub fn with(record: SecretRecord) -> Self {
        Self {
            record: Some(record),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretRepository for StubRepo {
    async fn get_secret(
        &self,
        _ctx: &CallContext,
        key: &str,
    ) -> anyhow::Result<Option<SecretRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.record.clone().filter(|r| r.key == key))
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub client: SecretClient,
    pub repo: Arc<StubRepo>,
    pub kms: Arc<FakeKms>,
    pub ssm: Arc<FakeSsm>,
}

pub fn harness(repo: StubRepo, kms: FakeKms, ssm: FakeSsm) -> Harness {
    let repo = Arc::new(repo);
    let kms = Arc::new(kms);
    let ssm = Arc::new(ssm);
    let client = SecretClient::new(
        repo.clone(),
        Arc::new(KmsProvider::new(kms.clone(), 1024, Duration::from_secs(300))),
        Arc::new(SsmProvider::new(ssm.clone(), 1024, Duration::from_secs(300))),
        4096,
        Duration::from_secs(60),
    );
    Harness {
        client,
        repo,
        kms,
        ssm,
    }
}
