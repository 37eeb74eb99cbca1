//! Settlement history (baixas financeiras) and the receivable view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billops_core::Money;

use crate::invoice::{Invoice, InvoiceStatus};

/// What triggered a settlement recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementSource {
    #[serde(rename = "faturamento.pagamento")]
    Payment,
    #[serde(rename = "pagamento.processamento")]
    Processing,
    #[serde(rename = "pagamento.estorno")]
    Reversal,
}

/// One entry of an invoice's settlement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    pub timestamp: DateTime<Utc>,
    pub origem: SettlementSource,
    pub correlation_id: Option<String>,
    pub status_anterior: InvoiceStatus,
    pub status_novo: InvoiceStatus,
    pub valor_total: Money,
    pub valor_pago: Money,
    /// Signed amount moved by this step (negative for reversals).
    pub valor_movimento: Money,
    pub quantidade_pagamentos_aprovados: usize,
}

/// Receivable bucket derived from the invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Aberto,
    Parcial,
    Baixado,
}

impl From<InvoiceStatus> for ReceivableStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Paga => ReceivableStatus::Baixado,
            InvoiceStatus::ParcialmentePaga => ReceivableStatus::Parcial,
            _ => ReceivableStatus::Aberto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub status: ReceivableStatus,
    pub valor_total: Money,
    pub valor_pago: Money,
    pub valor_em_aberto: Money,
}

impl Receivable {
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            status: invoice.status().into(),
            valor_total: invoice.valor_total(),
            valor_pago: invoice.valor_pago(),
            valor_em_aberto: (invoice.valor_total() - invoice.valor_pago()).clamp_non_negative(),
        }
    }
}

/// Keep only the most recent `limit` records.
pub(crate) fn trim_history(history: &mut Vec<SettlementRecord>, limit: usize) {
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: i64) -> SettlementRecord {
        SettlementRecord {
            timestamp: DateTime::<Utc>::from_timestamp(n, 0).unwrap(),
            origem: SettlementSource::Payment,
            correlation_id: None,
            status_anterior: InvoiceStatus::Pendente,
            status_novo: InvoiceStatus::ParcialmentePaga,
            valor_total: Money::from_units(10),
            valor_pago: Money::from_units(n),
            valor_movimento: Money::from_units(1),
            quantidade_pagamentos_aprovados: n as usize,
        }
    }

    #[test]
    fn trim_keeps_most_recent_entries() {
        let mut history: Vec<_> = (1..=5).map(record).collect();
        trim_history(&mut history, 3);
        let kept: Vec<i64> = history.iter().map(|r| r.valor_pago.cents() / 100).collect();
        assert_eq!(kept, vec![3, 4, 5]);
    }

    #[test]
    fn receivable_bucket_follows_status() {
        assert_eq!(ReceivableStatus::from(InvoiceStatus::Paga), ReceivableStatus::Baixado);
        assert_eq!(
            ReceivableStatus::from(InvoiceStatus::ParcialmentePaga),
            ReceivableStatus::Parcial
        );
        assert_eq!(ReceivableStatus::from(InvoiceStatus::Vencida), ReceivableStatus::Aberto);
        assert_eq!(
            serde_json::to_value(SettlementSource::Reversal).unwrap(),
            "pagamento.estorno"
        );
    }
}
