//! Point-in-time views of the entities the rules inspect.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use billops_core::{ContractId, EntityKind, InvoiceId, Money, PayableId, PaymentId, SupplierId};
use billops_invoicing::{Invoice, InvoiceStatus, Payment, PaymentStatus};
use billops_parties::{Contract, ContractStatus, Payable, PayableStatus, Supplier, SupplierDependencies};

/// Action the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedAction {
    Delete,
    Cancel,
    Reverse,
    Deactivate,
    Activate,
    MarkPaid,
    Export,
    SendReminder,
}

impl RequestedAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestedAction::Delete => "delete",
            RequestedAction::Cancel => "cancel",
            RequestedAction::Reverse => "reverse",
            RequestedAction::Deactivate => "deactivate",
            RequestedAction::Activate => "activate",
            RequestedAction::MarkPaid => "mark_paid",
            RequestedAction::Export => "export",
            RequestedAction::SendReminder => "send_reminder",
        }
    }

    /// Export, reminders and activation never need a confirmation.
    pub fn is_non_destructive(self) -> bool {
        matches!(
            self,
            RequestedAction::Export | RequestedAction::SendReminder | RequestedAction::Activate
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSnapshot {
    pub id: InvoiceId,
    pub numero: String,
    pub status: InvoiceStatus,
    pub valor_total: Money,
    pub valor_pago: Money,
    pub tem_pagamentos: bool,
    pub vencida: bool,
    pub data_vencimento: NaiveDate,
    pub cliente: Option<String>,
}

impl InvoiceSnapshot {
    /// Captures the invoice with its overdue view evaluated at `now`.
    pub fn capture(invoice: &Invoice, now: DateTime<Utc>) -> Self {
        Self {
            id: invoice.invoice_id(),
            numero: invoice.numero().to_string(),
            status: invoice.status(),
            valor_total: invoice.valor_total(),
            valor_pago: invoice.valor_pago(),
            tem_pagamentos: invoice.has_payments(),
            vencida: invoice.is_overdue(now) || invoice.status() == InvoiceStatus::Vencida,
            data_vencimento: invoice.data_vencimento(),
            cliente: invoice.cliente().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSnapshot {
    pub id: PaymentId,
    pub transacao_id: String,
    pub valor: Money,
    pub status: PaymentStatus,
}

impl From<&Payment> for PaymentSnapshot {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            transacao_id: payment.transacao_id.clone(),
            valor: payment.valor,
            status: payment.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSnapshot {
    pub id: SupplierId,
    pub nome: String,
    pub ativo: bool,
    pub dependencias: SupplierDependencies,
}

impl From<&Supplier> for SupplierSnapshot {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: supplier.supplier_id(),
            nome: supplier.nome().to_string(),
            ativo: supplier.is_active(),
            dependencias: supplier.dependencias(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub id: ContractId,
    pub numero: String,
    pub status: ContractStatus,
    pub faturas_vinculadas: u32,
    pub contraparte: Option<String>,
}

impl From<&Contract> for ContractSnapshot {
    fn from(contract: &Contract) -> Self {
        Self {
            id: contract.id,
            numero: contract.numero.clone(),
            status: contract.status,
            faturas_vinculadas: contract.faturas_vinculadas,
            contraparte: contract.contraparte.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableSnapshot {
    pub id: PayableId,
    pub numero: String,
    pub status: PayableStatus,
    pub valor_total: Money,
    pub valor_pago: Money,
    pub parcialmente_paga: bool,
    pub aguardando_aprovacao: bool,
    pub data_vencimento: NaiveDate,
    pub fornecedor: Option<String>,
}

impl From<&Payable> for PayableSnapshot {
    fn from(payable: &Payable) -> Self {
        Self {
            id: payable.id,
            numero: payable.numero.clone(),
            status: payable.status,
            valor_total: payable.valor_total,
            valor_pago: payable.valor_pago,
            parcialmente_paga: payable.is_partially_paid(),
            aguardando_aprovacao: payable.aguardando_aprovacao,
            data_vencimento: payable.data_vencimento,
            fornecedor: payable.fornecedor.clone(),
        }
    }
}

/// Tagged snapshot; rules dispatch on the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntitySnapshot {
    Invoice(InvoiceSnapshot),
    Payment(PaymentSnapshot),
    Supplier(SupplierSnapshot),
    Contract(ContractSnapshot),
    Payable(PayableSnapshot),
}

impl EntitySnapshot {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntitySnapshot::Invoice(_) => EntityKind::Invoice,
            EntitySnapshot::Payment(_) => EntityKind::Payment,
            EntitySnapshot::Supplier(_) => EntityKind::Supplier,
            EntitySnapshot::Contract(_) => EntityKind::Contract,
            EntitySnapshot::Payable(_) => EntityKind::Payable,
        }
    }

    /// Identifier as used on the remote API.
    pub fn remote_id(&self) -> String {
        match self {
            EntitySnapshot::Invoice(s) => s.id.to_string(),
            EntitySnapshot::Payment(s) => s.id.to_string(),
            EntitySnapshot::Supplier(s) => s.id.to_string(),
            EntitySnapshot::Contract(s) => s.id.to_string(),
            EntitySnapshot::Payable(s) => s.id.to_string(),
        }
    }

    pub fn display_ref(&self) -> String {
        match self {
            EntitySnapshot::Invoice(s) => s.numero.clone(),
            EntitySnapshot::Payment(s) => s.transacao_id.clone(),
            EntitySnapshot::Supplier(s) => s.nome.clone(),
            EntitySnapshot::Contract(s) => s.numero.clone(),
            EntitySnapshot::Payable(s) => s.numero.clone(),
        }
    }
}

/// Snapshot of an invoice at `now`.
pub fn capture(invoice: &Invoice, now: DateTime<Utc>) -> EntitySnapshot {
    EntitySnapshot::Invoice(InvoiceSnapshot::capture(invoice, now))
}

impl From<&Payment> for EntitySnapshot {
    fn from(payment: &Payment) -> Self {
        EntitySnapshot::Payment(payment.into())
    }
}

impl From<&Supplier> for EntitySnapshot {
    fn from(supplier: &Supplier) -> Self {
        EntitySnapshot::Supplier(supplier.into())
    }
}

impl From<&Contract> for EntitySnapshot {
    fn from(contract: &Contract) -> Self {
        EntitySnapshot::Contract(contract.into())
    }
}

impl From<&Payable> for EntitySnapshot {
    fn from(payable: &Payable) -> Self {
        EntitySnapshot::Payable(payable.into())
    }
}
