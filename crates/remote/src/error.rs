use thiserror::Error;

/// Failure reported by the remote API (or its transport).
///
/// `code` is the machine-readable error code when the server sent one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    pub code: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    pub fn not_found(what: impl core::fmt::Display) -> Self {
        Self::with_code(format!("{what} not found"), "not_found")
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some("not_found")
    }
}
