//! AWS SDK bindings for the external collaborators.
//!
//! [`aws_sdk_kms::Client`] implements [`KeyUnwrapService`](crate::KeyUnwrapService)
//! and [`aws_sdk_ssm::Client`] implements
//! [`ParameterService`](crate::ParameterService). Credentials and region come
//! from the standard AWS provider chain.

pub mod clients;
mod services;

pub use clients::AwsClients;
