//! AWS SDK client bundle.

use aws_config::{BehaviorVersion, SdkConfig};

/// KMS and SSM clients sharing one resolved [`aws_config::SdkConfig`].
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// Unwraps DEKs.
    pub kms: aws_sdk_kms::Client,
    /// Fetches externally hosted ciphertext.
    pub ssm: aws_sdk_ssm::Client,
}

impl AwsClients {
    /// Load the shared SDK config and build both clients.
    ///
    /// `endpoint_url` overrides the service endpoint for both clients, e.g.
    /// `http://localhost:4566` for LocalStack.
    pub async fn init(endpoint_url: Option<&str>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::from_sdk_config(&config, endpoint_url)
    }

    /// Build both clients from an already loaded SDK config.
    pub fn from_sdk_config(config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let shared = with_endpoint(config, endpoint_url);
        Self {
            kms: aws_sdk_kms::Client::new(&shared),
            ssm: aws_sdk_ssm::Client::new(&shared),
        }
    }
}

/// `config` with its endpoint replaced by `endpoint_url` when one is given.
///
/// Service configs derived from the result inherit the override.
fn with_endpoint(config: &SdkConfig, endpoint_url: Option<&str>) -> SdkConfig {
    match endpoint_url {
        Some(url) => config.to_builder().endpoint_url(url).build(),
        None => config.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::Region;

    fn sdk_config() -> SdkConfig {
        SdkConfig::builder()
            .region(Region::new("eu-north-1"))
            .behavior_version(BehaviorVersion::latest())
            .build()
    }

    #[test]
    fn clients_inherit_region() {
        let clients = AwsClients::from_sdk_config(&sdk_config(), None);
        assert_eq!(
            clients.kms.config().region().map(|r| r.as_ref()),
            Some("eu-north-1")
        );
        assert_eq!(
            clients.ssm.config().region().map(|r| r.as_ref()),
            Some("eu-north-1")
        );
    }

    #[test]
    fn endpoint_override_is_carried_by_shared_config() {
        let shared = with_endpoint(&sdk_config(), Some("http://localhost:4566"));
        assert_eq!(shared.endpoint_url(), Some("http://localhost:4566"));
        assert_eq!(shared.region().map(|r| r.as_ref()), Some("eu-north-1"));
    }

    #[test]
    fn no_override_keeps_default_endpoint() {
        let shared = with_endpoint(&sdk_config(), None);
        assert!(shared.endpoint_url().is_none());
    }

    #[test]
    fn overridden_clients_keep_region() {
        let clients = AwsClients::from_sdk_config(&sdk_config(), Some("http://localhost:4566"));
        assert_eq!(
            clients.kms.config().region().map(|r| r.as_ref()),
            Some("eu-north-1")
        );
        assert_eq!(
            clients.ssm.config().region().map(|r| r.as_ref()),
            Some("eu-north-1")
        );
    }
}
