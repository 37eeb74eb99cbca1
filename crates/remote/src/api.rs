use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use billops_core::{EntityKind, InvoiceId};

use crate::error::RemoteError;

/// Outcome of an e-mail dispatch.
///
/// `simulado` is set by the transport itself (e.g. no SMTP configured); the
/// caller must never guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDispatch {
    pub simulado: bool,
}

/// Query parameters for `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

/// Operations of the remote API, used for call recording and scripted failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteOperation {
    Get,
    List,
    Create,
    Update,
    Delete,
    SendEmail,
    GeneratePaymentLink,
    DownloadDocument,
}

impl RemoteOperation {
    /// Whether the call changes remote state.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            RemoteOperation::Create
                | RemoteOperation::Update
                | RemoteOperation::Delete
                | RemoteOperation::SendEmail
                | RemoteOperation::GeneratePaymentLink
        )
    }
}

/// Remote API client.
///
/// Every call is an independent request/response; implementations do not
/// retry.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Value, RemoteError>;

    async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Value>, RemoteError>;

    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, RemoteError>;

    async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> Result<Value, RemoteError>;

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), RemoteError>;

    async fn send_email(
        &self,
        invoice_id: InvoiceId,
        template: &str,
        correlation: &str,
    ) -> Result<EmailDispatch, RemoteError>;

    async fn generate_payment_link(&self, invoice_id: InvoiceId) -> Result<String, RemoteError>;

    async fn download_document(&self, invoice_id: InvoiceId) -> Result<Vec<u8>, RemoteError>;
}
