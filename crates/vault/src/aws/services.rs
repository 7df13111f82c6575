//! Collaborator trait implementations for the AWS SDK clients.
//!
//! The core already races these calls against the caller's [`CallContext`];
//! dropping the future aborts the in-flight request.

use std::collections::HashMap;

use anyhow::Context as _;
use async_trait::async_trait;
use aws_sdk_kms::primitives::Blob;

use crate::context::CallContext;
use crate::kms::{KeyUnwrapService, UnwrapRequest};
use crate::ssm::{FetchRequest, ParameterService};

#[async_trait]
impl KeyUnwrapService for aws_sdk_kms::Client {
    async fn unwrap_dek(
        &self,
        _ctx: &CallContext,
        request: UnwrapRequest,
    ) -> anyhow::Result<Vec<u8>> {
        let context: Option<HashMap<String, String>> = request
            .encryption_context
            .map(|ctx| ctx.into_iter().collect());

        let resp = self
            .decrypt()
            .ciphertext_blob(Blob::new(request.ciphertext_blob))
            .set_encryption_context(context)
            .set_key_id(request.key_id)
            .send()
            .await
            .context("KMS Decrypt")?;

        let plaintext = resp
            .plaintext()
            .context("KMS decrypt response contained no plaintext")?;
        Ok(plaintext.as_ref().to_vec())
    }
}

#[async_trait]
impl ParameterService for aws_sdk_ssm::Client {
    async fn fetch_parameter(
        &self,
        _ctx: &CallContext,
        request: FetchRequest,
    ) -> anyhow::Result<String> {
        let resp = self
            .get_parameter()
            .name(&request.name)
            .with_decryption(request.with_decryption)
            .send()
            .await
            .with_context(|| format!("SSM GetParameter {}", request.name))?;

        let value = resp
            .parameter()
            .and_then(|p| p.value())
            .with_context(|| format!("SSM parameter {} has no value", request.name))?;
        Ok(value.to_owned())
    }
}
