use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billops_core::{InvoiceId, Money, PaymentId};

/// Payment processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pendente,
    Aprovado,
    Rejeitado,
}

/// How the payment was made (formaPagamento).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    CartaoCredito,
    CartaoDebito,
    Transferencia,
    Dinheiro,
}

/// A payment registered against an invoice.
///
/// `transacao_id` is the idempotency key: it is unique per invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub fatura_id: InvoiceId,
    pub valor: Money,
    pub data_pagamento: DateTime<Utc>,
    pub forma_pagamento: PaymentMethod,
    pub status: PaymentStatus,
    pub transacao_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

impl Payment {
    /// New payment in `pendente` status.
    pub fn new(
        fatura_id: InvoiceId,
        valor: Money,
        forma_pagamento: PaymentMethod,
        transacao_id: impl Into<String>,
        data_pagamento: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            fatura_id,
            valor,
            data_pagamento,
            forma_pagamento,
            status: PaymentStatus::Pendente,
            transacao_id: transacao_id.into(),
            observacoes: None,
        }
    }

    /// Same payment, already approved (manual registrations are approved on entry).
    pub fn approved(mut self) -> Self {
        self.status = PaymentStatus::Aprovado;
        self
    }

    pub fn with_observacoes(mut self, observacoes: impl Into<String>) -> Self {
        self.observacoes = Some(observacoes.into());
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Aprovado
    }

    /// Transaction id for a manually registered payment: `PAG_<millis>_<invoice>`.
    pub fn manual_transaction_id(fatura_id: InvoiceId, now: DateTime<Utc>) -> String {
        format!("PAG_{}_{}", now.timestamp_millis(), fatura_id)
    }
}
