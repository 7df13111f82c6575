//! Shared model types for `envelope-vault`: the persisted secret record, its
//! enumerations, and the canonical logical-key layout.

pub mod error;
pub mod keys;
pub mod record;

pub use error::ModelError;
pub use keys::make_key;
pub use record::{Environment, SecretRecord, Status, Store};
