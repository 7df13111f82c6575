//! The persisted secret record and its enumerated columns.
//!
//! Only the ciphertext material and the identity fields are read by the
//! decryption pipeline. Everything else (status, versioning, audit columns) is
//! carried through opaquely so callers can inspect it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Store discriminator
// ---------------------------------------------------------------------------

/// Where a secret's ciphertext lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    /// Ciphertext is hosted in SSM Parameter Store under the record's key;
    /// the record's `value` column is empty.
    AwsSsm,
    /// Ciphertext is embedded in the record's `value` column.
    #[default]
    DsVault,
}

impl Store {
    /// The persisted column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Store::AwsSsm => "aws_ssm",
            Store::DsVault => "ds_vault",
        }
    }

    /// Returns `true` when the ciphertext must be fetched from outside the record.
    pub fn is_external(&self) -> bool {
        matches!(self, Store::AwsSsm)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Store {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws_ssm" => Ok(Store::AwsSsm),
            "ds_vault" => Ok(Store::DsVault),
            other => Err(ModelError::UnknownStore(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle status
// ---------------------------------------------------------------------------

/// Lifecycle state of a secret. Not interpreted by the decryption pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Deleted,
    Suspended,
    Rejected,
    Draft,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Deleted => "deleted",
            Status::Suspended => "suspended",
            Status::Rejected => "rejected",
            Status::Draft => "draft",
            Status::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "deleted" => Ok(Status::Deleted),
            "suspended" => Ok(Status::Suspended),
            "rejected" => Ok(Status::Rejected),
            "draft" => Ok(Status::Draft),
            "closed" => Ok(Status::Closed),
            other => Err(ModelError::UnknownStatus(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Deployment environment segment of a logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ModelError::UnknownEnvironment(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A secret's metadata row as loaded from the repository.
///
/// All ciphertext material is base64 (standard alphabet, padded). The record
/// is treated as immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_by: String,

    /// Logical key; doubles as the SSM parameter name for [`Store::AwsSsm`].
    pub key: String,
    pub store: Store,
    /// Base64 ciphertext without the tag. Empty for [`Store::AwsSsm`].
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub acl: BTreeMap<String, Vec<String>>,
    /// Base64 12-byte GCM nonce.
    pub iv: String,
    /// Base64 16-byte GCM authentication tag.
    pub tag: String,
    /// Base64 KMS ciphertext blob of the DEK.
    pub wrapped_dek: String,
    /// KMS key id or ARN used to wrap the DEK. May be empty.
    #[serde(default)]
    pub kek_key_id: String,
    /// e.g. `AES-256-GCM`.
    #[serde(default)]
    pub dek_alg: String,
    /// e.g. `AWS-KMS`.
    #[serde(default)]
    pub kek_alg: String,
}
