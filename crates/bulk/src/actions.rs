//! Built-in bulk actions.

use core::fmt::Display;

use async_trait::async_trait;
use serde_json::{Value, json};

use billops_core::{EntityKind, InvoiceId, PayableId};
use billops_parties::Payable;
use billops_remote::{RemoteApi, RemoteError};
use billops_safeguard::RequestedAction;

/// One remote mutation (or fetch) applied to each selected id.
#[async_trait]
pub trait BulkAction<Id>: Send + Sync
where
    Id: Sync,
{
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Collection touched by the action; refreshed once after the batch.
    fn collection(&self) -> EntityKind;

    /// Safeguard check run before the first item, if the action needs one.
    fn guarded_as(&self) -> Option<RequestedAction> {
        None
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &Id) -> Result<Value, RemoteError>;
}

/// Deletes every selected record of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteEntities {
    kind: EntityKind,
}

impl DeleteEntities {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    pub fn invoices() -> Self {
        Self::new(EntityKind::Invoice)
    }

    pub fn suppliers() -> Self {
        Self::new(EntityKind::Supplier)
    }

    pub fn payables() -> Self {
        Self::new(EntityKind::Payable)
    }
}

#[async_trait]
impl<Id> BulkAction<Id> for DeleteEntities
where
    Id: Display + Sync,
{
    fn name(&self) -> &'static str {
        "delete"
    }

    fn collection(&self) -> EntityKind {
        self.kind
    }

    fn guarded_as(&self) -> Option<RequestedAction> {
        Some(RequestedAction::Delete)
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &Id) -> Result<Value, RemoteError> {
        remote.delete(self.kind, &id.to_string()).await?;
        Ok(Value::Null)
    }
}

/// Flips the `ativo` flag of the selected suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSupplierActive {
    ativo: bool,
}

impl SetSupplierActive {
    pub fn activate() -> Self {
        Self { ativo: true }
    }

    pub fn deactivate() -> Self {
        Self { ativo: false }
    }
}

#[async_trait]
impl<Id> BulkAction<Id> for SetSupplierActive
where
    Id: Display + Sync,
{
    fn name(&self) -> &'static str {
        if self.ativo { "activate" } else { "deactivate" }
    }

    fn collection(&self) -> EntityKind {
        EntityKind::Supplier
    }

    fn guarded_as(&self) -> Option<RequestedAction> {
        (!self.ativo).then_some(RequestedAction::Deactivate)
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &Id) -> Result<Value, RemoteError> {
        remote
            .update(EntityKind::Supplier, &id.to_string(), json!({ "ativo": self.ativo }))
            .await
    }
}

/// Sends one invoice e-mail per selected invoice.
///
/// The item value is `{"simulado": bool}` as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendInvoiceEmails {
    template: String,
}

impl SendInvoiceEmails {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Default for SendInvoiceEmails {
    fn default() -> Self {
        Self::new("fatura")
    }
}

#[async_trait]
impl BulkAction<InvoiceId> for SendInvoiceEmails {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn collection(&self) -> EntityKind {
        EntityKind::Invoice
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &InvoiceId) -> Result<Value, RemoteError> {
        let correlation = format!("envio_lote:{id}");
        let dispatch = remote.send_email(*id, &self.template, &correlation).await?;
        Ok(json!({ "simulado": dispatch.simulado }))
    }
}

/// Marks the selected payables as paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkPayablesPaid;

impl MarkPayablesPaid {
    /// Selected ids that may be marked paid, in selection order.
    ///
    /// Ids without a matching payable in `visible` are dropped.
    pub fn eligible(selected: &[PayableId], visible: &[Payable]) -> Vec<PayableId> {
        selected
            .iter()
            .filter(|id| {
                visible
                    .iter()
                    .any(|p| p.id == **id && p.is_eligible_for_mark_paid())
            })
            .copied()
            .collect()
    }
}

#[async_trait]
impl BulkAction<PayableId> for MarkPayablesPaid {
    fn name(&self) -> &'static str {
        "mark_paid"
    }

    fn collection(&self) -> EntityKind {
        EntityKind::Payable
    }

    fn guarded_as(&self) -> Option<RequestedAction> {
        Some(RequestedAction::MarkPaid)
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &PayableId) -> Result<Value, RemoteError> {
        remote
            .update(EntityKind::Payable, &id.to_string(), json!({ "status": "pago" }))
            .await
    }
}

/// Reads each selected record; the values become export rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchForExport {
    kind: EntityKind,
}

impl FetchForExport {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl<Id> BulkAction<Id> for FetchForExport
where
    Id: Display + Sync,
{
    fn name(&self) -> &'static str {
        "export"
    }

    fn collection(&self) -> EntityKind {
        self.kind
    }

    async fn apply(&self, remote: &dyn RemoteApi, id: &Id) -> Result<Value, RemoteError> {
        remote.get(self.kind, &id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billops_core::Money;
    use billops_parties::PayableStatus;
    use chrono::NaiveDate;

    fn payable(n: u128) -> Payable {
        Payable::new(
            PayableId::from_u128(n),
            format!("CP-{n}"),
            Money::from_units(50),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    #[test]
    fn mark_paid_skips_paid_cancelled_and_pending_approval() {
        let visible = vec![
            payable(1),
            payable(2).with_status(PayableStatus::Pago),
            payable(3).with_status(PayableStatus::Cancelado),
            payable(4).awaiting_approval(),
            payable(5).with_status(PayableStatus::Vencido),
        ];
        let selected: Vec<_> = (1..=6).rev().map(PayableId::from_u128).collect();

        assert_eq!(
            MarkPayablesPaid::eligible(&selected, &visible),
            vec![PayableId::from_u128(5), PayableId::from_u128(1)]
        );
    }

    #[test]
    fn only_deactivation_is_guarded() {
        let on = SetSupplierActive::activate();
        let off = SetSupplierActive::deactivate();
        assert_eq!(BulkAction::<String>::guarded_as(&on), None);
        assert_eq!(
            BulkAction::<String>::guarded_as(&off),
            Some(RequestedAction::Deactivate)
        );
    }
}
