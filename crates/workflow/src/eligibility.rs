//! Which invoices each workflow acts on.
//!
//! Days are counted on calendar dates, with "today" taken from `now`.

use chrono::{DateTime, Utc};

use billops_invoicing::{Invoice, InvoiceStatus, days_until_due};

use crate::definition::WorkflowId;

/// Open invoice due within `[0, window_days]` days.
pub fn is_due_soon(invoice: &Invoice, now: DateTime<Utc>, window_days: i64) -> bool {
    let days = days_until_due(invoice.data_vencimento(), now);
    invoice.status().is_open() && (0..=window_days).contains(&days)
}

/// Past due and neither paid nor cancelled.
pub fn needs_collection(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    days_until_due(invoice.data_vencimento(), now) < 0
        && !matches!(invoice.status(), InvoiceStatus::Paga | InvoiceStatus::Cancelada)
}

/// Overdue by date, whatever the stored status says; the flag push is idempotent.
pub fn needs_overdue_sync(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    invoice.is_overdue(now)
}

/// Invoices `workflow` would dispatch to, in input order.
pub fn eligible<'a>(
    workflow: WorkflowId,
    invoices: &'a [Invoice],
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|invoice| match workflow {
            WorkflowId::LembreteVencimento => is_due_soon(invoice, now, window_days),
            WorkflowId::CobrancaVencidas => needs_collection(invoice, now),
            WorkflowId::SincronizacaoFinanceira => needs_overdue_sync(invoice, now),
        })
        .collect()
}
