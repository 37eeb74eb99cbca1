use thiserror::Error;

use billops_core::DomainError;

use crate::aggregates::Overpayment;
use crate::invoice::InvoiceStatus;

/// Rejections raised by the invoice state machine and reconciliation.
///
/// Every variant stops the single mutation that raised it; the invoice the
/// caller holds is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Illegal status change (e.g. a user setting `PAGA` directly).
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: InvoiceStatus, to: InvoiceStatus },

    /// Approved payments would exceed the invoice total.
    #[error(transparent)]
    OverpaymentDetected(#[from] Overpayment),

    /// The idempotency key was already applied to this invoice.
    #[error("payment '{transacao_id}' was already applied to this invoice")]
    DuplicatePaymentReplay { transacao_id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LifecycleError {
    pub fn invalid_transition(from: InvoiceStatus, to: InvoiceStatus) -> Self {
        Self::InvalidTransition { from, to }
    }
}
