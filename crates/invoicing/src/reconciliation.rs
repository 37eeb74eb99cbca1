//! Payment reconciliation service.
//!
//! Each call takes the invoice the caller holds, runs one command against a
//! copy, and hands back the new invoice. On rejection nothing changes.

use chrono::{DateTime, Utc};

use billops_core::{ConsoleConfig, execute};

use crate::error::LifecycleError;
use crate::invoice::{Invoice, InvoiceCommand, InvoiceEvent, InvoiceStatus};
use crate::payment::{Payment, PaymentStatus};

/// Outcome of a successful reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub invoice: Invoice,
    pub status: InvoiceStatus,
    pub events: Vec<InvoiceEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    settlement_history_limit: usize,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&ConsoleConfig::default())
    }
}

impl Reconciler {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            settlement_history_limit: config.settlement_history_limit,
        }
    }

    pub fn settlement_history_limit(&self) -> usize {
        self.settlement_history_limit
    }

    /// Append a payment and recompute the invoice.
    ///
    /// A `transacao_id` already present on the invoice is rejected with
    /// [`LifecycleError::DuplicatePaymentReplay`], so replays never double count.
    pub fn apply_payment(
        &self,
        invoice: &Invoice,
        payment: Payment,
        correlation_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Reconciled, LifecycleError> {
        let transacao_id = payment.transacao_id.clone();
        let result = self.run(
            invoice,
            InvoiceCommand::ApplyPayment {
                payment,
                correlation_id,
                occurred_at: now,
            },
        );

        match &result {
            Ok(done) => tracing::info!(
                invoice_id = %invoice.invoice_id(),
                transacao_id = %transacao_id,
                status = %done.status,
                valor_pago = %done.invoice.valor_pago(),
                "payment reconciled"
            ),
            Err(LifecycleError::DuplicatePaymentReplay { .. }) => tracing::debug!(
                invoice_id = %invoice.invoice_id(),
                transacao_id = %transacao_id,
                "duplicate payment replay ignored"
            ),
            Err(err) => tracing::warn!(
                invoice_id = %invoice.invoice_id(),
                transacao_id = %transacao_id,
                error = %err,
                "payment rejected"
            ),
        }

        result
    }

    /// Approve or reject a pending payment.
    pub fn process_payment(
        &self,
        invoice: &Invoice,
        transacao_id: &str,
        novo_status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<Reconciled, LifecycleError> {
        let done = self.run(
            invoice,
            InvoiceCommand::ProcessPayment {
                transacao_id: transacao_id.to_string(),
                novo_status,
                occurred_at: now,
            },
        )?;
        tracing::info!(
            invoice_id = %invoice.invoice_id(),
            transacao_id,
            status = %done.status,
            "payment processed"
        );
        Ok(done)
    }

    /// Reverse (estorno) an approved payment.
    pub fn reverse_payment(
        &self,
        invoice: &Invoice,
        transacao_id: &str,
        motivo: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Reconciled, LifecycleError> {
        let done = self.run(
            invoice,
            InvoiceCommand::ReversePayment {
                transacao_id: transacao_id.to_string(),
                motivo: motivo.clone(),
                occurred_at: now,
            },
        )?;
        tracing::info!(
            invoice_id = %invoice.invoice_id(),
            transacao_id,
            motivo = motivo.as_deref().unwrap_or(""),
            status = %done.status,
            "payment reversed"
        );
        Ok(done)
    }

    fn run(&self, invoice: &Invoice, command: InvoiceCommand) -> Result<Reconciled, LifecycleError> {
        let mut next = invoice.clone();
        let events = execute(&mut next, &command)?;
        next.trim_settlements(self.settlement_history_limit);
        Ok(Reconciled {
            status: next.status(),
            invoice: next,
            events,
        })
    }
}
