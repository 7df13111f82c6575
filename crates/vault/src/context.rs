//! Per-call cancellation and deadline.
//!
//! A [`CallContext`] is threaded through every operation that may reach an
//! external service. The pipeline races each collaborator future against the
//! token and the deadline; collaborators receive the same context so they can
//! honour it themselves.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::VaultError;

/// Cancellation token plus optional absolute deadline for one call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Return a copy that expires `timeout` from now, or earlier if a tighter
    /// deadline is already set.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Return a copy that expires at `deadline`, or earlier if a tighter
    /// deadline is already set.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first. `operation` names the call in the error.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T, VaultError>
    where
        F: Future<Output = Result<T, VaultError>>,
    {
        if self.token.is_cancelled() {
            return Err(VaultError::Cancelled { operation });
        }
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(VaultError::Cancelled { operation }),
                    _ = tokio::time::sleep_until(deadline) => {
                        Err(VaultError::DeadlineExceeded { operation })
                    }
                    res = fut => res,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(VaultError::Cancelled { operation }),
                    res = fut => res,
                }
            }
        }
    }
}
