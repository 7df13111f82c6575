//! Error types for the record model.

use thiserror::Error;

/// Errors raised while interpreting persisted record fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The `store` column holds a value outside the known discriminators.
    #[error("unknown secret store: {0:?}")]
    UnknownStore(String),

    /// The `status` column holds a value outside the known lifecycle states.
    #[error("unknown secret status: {0:?}")]
    UnknownStatus(String),

    /// The environment segment is neither `dev` nor `prod`.
    #[error("unknown environment: {0:?}")]
    UnknownEnvironment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_value() {
        let e = ModelError::UnknownStore("s3".into());
        assert!(e.to_string().contains("\"s3\""));
    }
}
