use thiserror::Error;

use billops_remote::RemoteError;
use billops_safeguard::SafeguardBlocked;

/// Failures that stop a bulk operation as a whole.
///
/// Per-item failures never show up here; they are collected in the
/// [`crate::BatchSummary`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BulkError {
    #[error(transparent)]
    SafeguardBlocked(#[from] SafeguardBlocked),

    #[error("remote call failed: {0}")]
    RemoteCallFailed(#[from] RemoteError),

    /// A destructive action was started without snapshots to check.
    #[error("bulk action `{action}` must run with a safeguard pre-flight")]
    PreflightRequired { action: &'static str },

    /// Selected ids and pre-flight snapshots do not pair up one to one.
    #[error("selection and safeguard snapshots disagree on item {id}")]
    SnapshotMismatch { id: String },
}

impl BulkError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, BulkError::SafeguardBlocked(_))
    }

    /// Refused before the first item; nothing was sent to the remote API.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            BulkError::SafeguardBlocked(_)
                | BulkError::PreflightRequired { .. }
                | BulkError::SnapshotMismatch { .. }
        )
    }
}
