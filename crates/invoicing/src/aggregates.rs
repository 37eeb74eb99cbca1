//! Monetary aggregate calculator.
//!
//! Pure functions: the same payment set and the same `now` always produce the
//! same output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use billops_core::Money;

use crate::invoice::{Invoice, InvoiceStatus};
use crate::payment::Payment;

/// Derived monetary view of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryAggregates {
    pub valor_pago: Money,
    pub valor_restante: Money,
    pub vencida: bool,
}

/// Approved payments exceed the invoice total.
///
/// `display` holds the clamped aggregates (remaining = 0) for presentation
/// only; the mutation that produced this error must still be rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("overpayment detected: approved payments {valor_pago} exceed total {valor_total} by {excess}")]
pub struct Overpayment {
    pub valor_total: Money,
    pub valor_pago: Money,
    pub excess: Money,
    pub display: MonetaryAggregates,
}

/// Recompute `valorPago`, `valorRestante` and `vencida` for `invoice` against
/// an explicit payment set.
pub fn recompute(
    invoice: &Invoice,
    payments: &[Payment],
    now: DateTime<Utc>,
) -> Result<MonetaryAggregates, Overpayment> {
    recompute_terms(
        invoice.valor_total(),
        invoice.status(),
        invoice.data_vencimento(),
        payments,
        now,
    )
}

/// Same as [`recompute`], from raw invoice terms (used while rehydrating).
pub fn recompute_terms(
    valor_total: Money,
    status: InvoiceStatus,
    data_vencimento: NaiveDate,
    payments: &[Payment],
    now: DateTime<Utc>,
) -> Result<MonetaryAggregates, Overpayment> {
    let valor_pago: Money = payments
        .iter()
        .filter(|p| p.is_approved())
        .map(|p| p.valor)
        .sum();

    let raw_restante = valor_total - valor_pago;
    let aggregates = MonetaryAggregates {
        valor_pago,
        valor_restante: raw_restante.clamp_non_negative(),
        vencida: is_overdue(status, data_vencimento, now),
    };

    if raw_restante.is_negative() {
        return Err(Overpayment {
            valor_total,
            valor_pago,
            excess: raw_restante.abs(),
            display: aggregates,
        });
    }

    Ok(aggregates)
}

/// Overdue view: not settled/cancelled and the due date is before today.
pub fn is_overdue(status: InvoiceStatus, data_vencimento: NaiveDate, now: DateTime<Utc>) -> bool {
    !status.is_terminal() && data_vencimento < now.date_naive()
}

/// Calendar days from today (date of `now`) to the due date; negative when overdue.
pub fn days_until_due(data_vencimento: NaiveDate, now: DateTime<Utc>) -> i64 {
    (data_vencimento - now.date_naive()).num_days()
}
