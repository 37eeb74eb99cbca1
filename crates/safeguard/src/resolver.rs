//! Safeguard resolution for single items and batches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use billops_core::{EntityKind, Money};

use crate::kind::{ConfirmationKind, Severity};
use crate::rules;
use crate::snapshot::{EntitySnapshot, RequestedAction};
use crate::variant::{ConfirmationVariant, SafeguardBlocked};

/// Values the prompt template interpolates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayContext {
    pub numero: Option<String>,
    pub valor: Option<Money>,
    pub contraparte: Option<String>,
    pub data_vencimento: Option<NaiveDate>,
    pub status: Option<String>,
    pub quantidade_itens: usize,
}

impl DisplayContext {
    fn of(snapshot: &EntitySnapshot) -> Self {
        let mut ctx = DisplayContext {
            quantidade_itens: 1,
            ..DisplayContext::default()
        };

        match snapshot {
            EntitySnapshot::Invoice(s) => {
                ctx.numero = Some(s.numero.clone());
                ctx.valor = Some(s.valor_total);
                ctx.contraparte = s.cliente.clone();
                ctx.data_vencimento = Some(s.data_vencimento);
                ctx.status = Some(s.status.label().to_string());
            }
            EntitySnapshot::Payment(s) => {
                ctx.numero = Some(s.transacao_id.clone());
                ctx.valor = Some(s.valor);
            }
            EntitySnapshot::Supplier(s) => {
                ctx.contraparte = Some(s.nome.clone());
                ctx.status = Some(if s.ativo { "Ativo" } else { "Inativo" }.to_string());
            }
            EntitySnapshot::Contract(s) => {
                ctx.numero = Some(s.numero.clone());
                ctx.contraparte = s.contraparte.clone();
                ctx.status = Some(s.status.label().to_string());
            }
            EntitySnapshot::Payable(s) => {
                ctx.numero = Some(s.numero.clone());
                ctx.valor = Some(s.valor_total);
                ctx.contraparte = s.fornecedor.clone();
                ctx.data_vencimento = Some(s.data_vencimento);
                ctx.status = Some(s.status.label().to_string());
            }
        }

        ctx
    }
}

/// Decision for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub action: RequestedAction,
    pub variant: ConfirmationVariant,
    /// Prompt template; `None` when the action proceeds without a prompt.
    pub kind: Option<ConfirmationKind>,
    pub severity: Severity,
    pub context: DisplayContext,
}

impl Resolution {
    pub fn is_blocked(&self) -> bool {
        self.variant.is_blocked()
    }

    pub fn requires_prompt(&self) -> bool {
        self.kind.is_some()
    }

    /// Blocking prompts only offer an acknowledgement.
    pub fn shows_cancel(&self) -> bool {
        !self.is_blocked()
    }
}

fn severity_of(variant: &ConfirmationVariant, kind: Option<ConfirmationKind>) -> Severity {
    if variant.is_blocked() {
        return Severity::Error;
    }
    kind.map_or(Severity::Info, ConfirmationKind::severity)
}

/// Resolve the confirmation for one entity.
pub fn resolve(snapshot: &EntitySnapshot, action: RequestedAction) -> Resolution {
    let outcome = rules::evaluate(snapshot, action);

    if let ConfirmationVariant::Block { reason, .. } = &outcome.variant {
        tracing::warn!(
            kind = %snapshot.kind(),
            id = %snapshot.remote_id(),
            action = action.as_str(),
            reason = %reason,
            "action blocked by safeguard"
        );
    }

    Resolution {
        action,
        severity: severity_of(&outcome.variant, outcome.kind),
        variant: outcome.variant,
        kind: outcome.kind,
        context: DisplayContext::of(snapshot),
    }
}

/// Aggregated decision for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResolution {
    pub action: RequestedAction,
    pub variant: ConfirmationVariant,
    pub kind: Option<ConfirmationKind>,
    pub severity: Severity,
    pub context: DisplayContext,
    pub items: Vec<Resolution>,
}

impl BatchResolution {
    pub fn is_blocked(&self) -> bool {
        self.variant.is_blocked()
    }

    pub fn blocked_items(&self) -> impl Iterator<Item = &Resolution> {
        self.items.iter().filter(|r| r.is_blocked())
    }

    pub fn blocked(&self) -> Option<SafeguardBlocked> {
        self.variant.clone().into_blocked()
    }
}

/// Resolve every item and aggregate to the strictest variant.
///
/// A single `Block` blocks the whole batch.
pub fn resolve_batch(snapshots: &[EntitySnapshot], action: RequestedAction) -> BatchResolution {
    let items: Vec<Resolution> = snapshots.iter().map(|s| resolve(s, action)).collect();
    let total = items.len();

    if total == 1 {
        let only = &items[0];
        return BatchResolution {
            action,
            variant: only.variant.clone(),
            kind: only.kind,
            severity: only.severity,
            context: only.context.clone(),
            items,
        };
    }

    let context = DisplayContext {
        quantidade_itens: total,
        ..DisplayContext::default()
    };

    let strictest = items
        .iter()
        .map(|r| r.variant.clone())
        .fold(ConfirmationVariant::Allow, ConfirmationVariant::stricter);

    let (variant, kind) = match strictest {
        ConfirmationVariant::Block {
            reason,
            alternative,
        } => {
            let blocked = items.iter().filter(|r| r.is_blocked()).count();
            let first_kind = items.iter().find(|r| r.is_blocked()).and_then(|r| r.kind);
            (
                ConfirmationVariant::Block {
                    reason: format!("{blocked} de {total} itens não podem ser processados: {reason}"),
                    alternative,
                },
                first_kind,
            )
        }
        ConfirmationVariant::AllowWithWarning { warning } => {
            let flagged = items
                .iter()
                .filter(|r| matches!(r.variant, ConfirmationVariant::AllowWithWarning { .. }))
                .count();
            (
                ConfirmationVariant::warn(format!(
                    "{flagged} de {total} itens exigem atenção: {warning}"
                )),
                batch_kind(snapshots, action, &items),
            )
        }
        ConfirmationVariant::Allow => {
            (ConfirmationVariant::Allow, batch_kind(snapshots, action, &items))
        }
    };

    let severity = items
        .iter()
        .map(|r| r.severity)
        .max()
        .unwrap_or(Severity::Info)
        .max(severity_of(&variant, kind));

    if variant.is_blocked() {
        tracing::warn!(action = action.as_str(), total, "batch blocked by safeguard");
    }

    BatchResolution {
        action,
        variant,
        kind,
        severity,
        context,
        items,
    }
}

fn batch_kind(
    snapshots: &[EntitySnapshot],
    action: RequestedAction,
    items: &[Resolution],
) -> Option<ConfirmationKind> {
    if snapshots.is_empty() {
        return None;
    }
    if action == RequestedAction::Delete {
        let all_invoices = snapshots.iter().all(|s| s.kind() == EntityKind::Invoice);
        return Some(if all_invoices {
            ConfirmationKind::DeleteMultipleInvoices
        } else {
            ConfirmationKind::DeleteMultipleItems
        });
    }
    items.iter().find_map(|r| r.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{
        ContractSnapshot, InvoiceSnapshot, PayableSnapshot, PaymentSnapshot, SupplierSnapshot,
    };
    use crate::variant::SuggestedAction;
    use billops_core::{ContractId, InvoiceId, PayableId, PaymentId, SupplierId};
    use billops_invoicing::{InvoiceStatus, PaymentStatus};
    use billops_parties::{ContractStatus, PayableStatus, SupplierDependencies};
    use proptest::prelude::*;

    fn invoice(status: InvoiceStatus, tem_pagamentos: bool, vencida: bool) -> EntitySnapshot {
        EntitySnapshot::Invoice(InvoiceSnapshot {
            id: InvoiceId::from_u128(1),
            numero: "FT-001".to_string(),
            status,
            valor_total: Money::from_units(1000),
            valor_pago: if tem_pagamentos { Money::from_units(100) } else { Money::ZERO },
            tem_pagamentos,
            vencida,
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            cliente: Some("Acme".to_string()),
        })
    }

    fn supplier(deps: SupplierDependencies) -> EntitySnapshot {
        EntitySnapshot::Supplier(SupplierSnapshot {
            id: SupplierId::from_u128(2),
            nome: "Fornecedor X".to_string(),
            ativo: true,
            dependencias: deps,
        })
    }

    fn contract(status: ContractStatus, faturas: u32) -> EntitySnapshot {
        EntitySnapshot::Contract(ContractSnapshot {
            id: ContractId::from_u128(3),
            numero: "CT-9".to_string(),
            status,
            faturas_vinculadas: faturas,
            contraparte: None,
        })
    }

    fn payment(status: PaymentStatus) -> EntitySnapshot {
        EntitySnapshot::Payment(PaymentSnapshot {
            id: PaymentId::from_u128(4),
            transacao_id: "tx-4".to_string(),
            valor: Money::from_units(50),
            status,
        })
    }

    fn payable(status: PayableStatus, valor_pago: i64) -> EntitySnapshot {
        EntitySnapshot::Payable(PayableSnapshot {
            id: PayableId::from_u128(5),
            numero: "CP-5".to_string(),
            status,
            valor_total: Money::from_units(300),
            valor_pago: Money::from_units(valor_pago),
            parcialmente_paga: valor_pago > 0 && valor_pago < 300 && status != PayableStatus::Pago,
            aguardando_aprovacao: false,
            data_vencimento: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            fornecedor: None,
        })
    }

    #[test]
    fn delete_paid_invoice_is_blocked_with_cancel_alternative() {
        let r = resolve(&invoice(InvoiceStatus::Paga, true, false), RequestedAction::Delete);
        assert_eq!(r.kind, Some(ConfirmationKind::DeletePaidInvoice));
        assert_eq!(r.severity, Severity::Error);
        assert!(!r.shows_cancel());
        match r.variant {
            ConfirmationVariant::Block { alternative, .. } => {
                assert_eq!(alternative, Some(SuggestedAction::CancelInstead));
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn delete_invoice_with_payments_warns() {
        let r = resolve(
            &invoice(InvoiceStatus::ParcialmentePaga, true, false),
            RequestedAction::Delete,
        );
        assert!(matches!(r.variant, ConfirmationVariant::AllowWithWarning { .. }));
        assert_eq!(r.kind, Some(ConfirmationKind::DeleteInvoiceWithPayments));
    }

    #[test]
    fn delete_plain_invoice_is_allowed() {
        let r = resolve(&invoice(InvoiceStatus::Pendente, false, false), RequestedAction::Delete);
        assert_eq!(r.variant, ConfirmationVariant::Allow);
        assert_eq!(r.kind, Some(ConfirmationKind::DeleteInvoice));
        assert_eq!(r.context.numero.as_deref(), Some("FT-001"));

        let cancelled = resolve(&invoice(InvoiceStatus::Cancelada, false, false), RequestedAction::Delete);
        assert_eq!(cancelled.variant, ConfirmationVariant::Allow);
    }

    #[test]
    fn cancel_rules() {
        let overdue = resolve(&invoice(InvoiceStatus::Enviada, false, true), RequestedAction::Cancel);
        assert_eq!(overdue.kind, Some(ConfirmationKind::CancelOverdueInvoice));
        assert!(matches!(overdue.variant, ConfirmationVariant::AllowWithWarning { .. }));

        let paid = resolve(&invoice(InvoiceStatus::Paga, true, false), RequestedAction::Cancel);
        assert!(paid.is_blocked());

        let plain = resolve(&invoice(InvoiceStatus::Pendente, false, false), RequestedAction::Cancel);
        assert_eq!(plain.variant, ConfirmationVariant::Allow);
    }

    #[test]
    fn supplier_rules() {
        let signed = supplier(SupplierDependencies {
            contratos_vinculados: 1,
            contratos_assinados: 1,
            ..SupplierDependencies::default()
        });
        assert!(resolve(&signed, RequestedAction::Delete).is_blocked());

        let loose = supplier(SupplierDependencies {
            faturas_abertas: 2,
            ..SupplierDependencies::default()
        });
        let r = resolve(&loose, RequestedAction::Delete);
        assert_eq!(r.kind, Some(ConfirmationKind::DeleteSupplierWithDependencies));
        assert!(!r.is_blocked());

        let payables = supplier(SupplierDependencies {
            contas_pagar_abertas: 1,
            ..SupplierDependencies::default()
        });
        assert!(matches!(
            resolve(&payables, RequestedAction::Deactivate).variant,
            ConfirmationVariant::AllowWithWarning { .. }
        ));

        let clean = supplier(SupplierDependencies::default());
        assert_eq!(resolve(&clean, RequestedAction::Delete).variant, ConfirmationVariant::Allow);
        assert!(!resolve(&clean, RequestedAction::Activate).requires_prompt());
    }

    #[test]
    fn contract_rules() {
        assert!(resolve(&contract(ContractStatus::Assinado, 0), RequestedAction::Delete).is_blocked());
        assert_eq!(
            resolve(&contract(ContractStatus::Enviado, 3), RequestedAction::Delete).kind,
            Some(ConfirmationKind::DeleteContractWithInvoices)
        );
        assert_eq!(
            resolve(&contract(ContractStatus::Rascunho, 0), RequestedAction::Delete).variant,
            ConfirmationVariant::Allow
        );
    }

    #[test]
    fn payment_rules() {
        assert!(matches!(
            resolve(&payment(PaymentStatus::Aprovado), RequestedAction::Reverse).variant,
            ConfirmationVariant::AllowWithWarning { .. }
        ));
        assert!(resolve(&payment(PaymentStatus::Pendente), RequestedAction::Reverse).is_blocked());
        assert!(resolve(&payment(PaymentStatus::Aprovado), RequestedAction::Delete).is_blocked());
        assert_eq!(
            resolve(&payment(PaymentStatus::Rejeitado), RequestedAction::Delete).variant,
            ConfirmationVariant::Allow
        );
    }

    #[test]
    fn payable_rules() {
        assert!(resolve(&payable(PayableStatus::Pago, 300), RequestedAction::Delete).is_blocked());
        assert_eq!(
            resolve(&payable(PayableStatus::EmAberto, 100), RequestedAction::Delete).kind,
            Some(ConfirmationKind::DeletePartiallyPaidPayable)
        );
        assert_eq!(
            resolve(&payable(PayableStatus::EmAberto, 0), RequestedAction::Delete).variant,
            ConfirmationVariant::Allow
        );
    }

    #[test]
    fn unsupported_combinations_are_blocked() {
        let r = resolve(&contract(ContractStatus::Rascunho, 0), RequestedAction::Reverse);
        assert_eq!(r.kind, Some(ConfirmationKind::UnsupportedAction));
        assert!(r.is_blocked());
    }

    #[test]
    fn non_destructive_actions_never_prompt() {
        for action in [RequestedAction::Export, RequestedAction::SendReminder, RequestedAction::Activate] {
            let r = resolve(&invoice(InvoiceStatus::Paga, true, false), action);
            assert_eq!(r.variant, ConfirmationVariant::Allow);
            assert!(!r.requires_prompt());
        }
    }

    #[test]
    fn one_paid_invoice_blocks_the_whole_batch() {
        let batch = resolve_batch(
            &[
                invoice(InvoiceStatus::Pendente, false, false),
                invoice(InvoiceStatus::Paga, true, false),
                invoice(InvoiceStatus::Enviada, true, false),
            ],
            RequestedAction::Delete,
        );
        assert!(batch.is_blocked());
        assert_eq!(batch.blocked_items().count(), 1);
        assert_eq!(batch.kind, Some(ConfirmationKind::DeletePaidInvoice));
        assert_eq!(batch.context.quantidade_itens, 3);
        assert!(batch.blocked().unwrap().reason.starts_with("1 de 3 itens"));
    }

    #[test]
    fn clean_batch_uses_multi_delete_prompt() {
        let batch = resolve_batch(
            &[
                invoice(InvoiceStatus::Pendente, false, false),
                invoice(InvoiceStatus::Enviada, false, false),
            ],
            RequestedAction::Delete,
        );
        assert_eq!(batch.variant, ConfirmationVariant::Allow);
        assert_eq!(batch.kind, Some(ConfirmationKind::DeleteMultipleInvoices));

        let mixed = resolve_batch(
            &[invoice(InvoiceStatus::Pendente, false, false), contract(ContractStatus::Rascunho, 0)],
            RequestedAction::Delete,
        );
        assert_eq!(mixed.kind, Some(ConfirmationKind::DeleteMultipleItems));
    }

    #[test]
    fn empty_batch_is_allowed_without_prompt() {
        let batch = resolve_batch(&[], RequestedAction::Delete);
        assert_eq!(batch.variant, ConfirmationVariant::Allow);
        assert_eq!(batch.kind, None);
        assert_eq!(batch.context.quantidade_itens, 0);
    }

    fn status_strategy() -> impl Strategy<Value = InvoiceStatus> {
        prop::sample::select(InvoiceStatus::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn paid_invoice_always_blocks_delete(tem_pagamentos in any::<bool>(), vencida in any::<bool>()) {
            let r = resolve(&invoice(InvoiceStatus::Paga, tem_pagamentos, vencida), RequestedAction::Delete);
            prop_assert!(r.is_blocked());
        }

        #[test]
        fn batch_containing_paid_invoice_always_blocks(
            others in prop::collection::vec((status_strategy(), any::<bool>(), any::<bool>()), 0..8),
            position in 0usize..8,
        ) {
            let mut snapshots: Vec<EntitySnapshot> = others
                .into_iter()
                .map(|(status, pagamentos, vencida)| invoice(status, pagamentos, vencida))
                .collect();
            let at = position.min(snapshots.len());
            snapshots.insert(at, invoice(InvoiceStatus::Paga, true, false));

            let batch = resolve_batch(&snapshots, RequestedAction::Delete);
            prop_assert!(batch.is_blocked());
            prop_assert_eq!(batch.items.len(), snapshots.len());
        }

        #[test]
        fn resolution_is_deterministic(status in status_strategy(), pagamentos in any::<bool>(), vencida in any::<bool>()) {
            let snapshot = invoice(status, pagamentos, vencida);
            prop_assert_eq!(
                resolve(&snapshot, RequestedAction::Cancel),
                resolve(&snapshot, RequestedAction::Cancel)
            );
        }
    }
}
