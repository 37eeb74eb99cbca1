use billops_invoicing::InvoiceStatus;

use super::RuleOutcome;
use crate::kind::ConfirmationKind;
use crate::snapshot::{InvoiceSnapshot, RequestedAction};
use crate::variant::{ConfirmationVariant, SuggestedAction};

pub(super) fn evaluate(s: &InvoiceSnapshot, action: RequestedAction) -> Option<RuleOutcome> {
    match action {
        RequestedAction::Delete => Some(delete(s)),
        RequestedAction::Cancel => Some(cancel(s)),
        _ => None,
    }
}

fn delete(s: &InvoiceSnapshot) -> RuleOutcome {
    if s.status == InvoiceStatus::Paga {
        return RuleOutcome::new(
            ConfirmationVariant::block(
                format!(
                    "a fatura {} já foi paga e não pode ser excluída para manter a integridade dos registros financeiros",
                    s.numero
                ),
                Some(SuggestedAction::CancelInstead),
            ),
            ConfirmationKind::DeletePaidInvoice,
        );
    }

    if s.tem_pagamentos {
        return RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "a fatura {} possui pagamentos registrados; excluí-la pode causar inconsistências nos relatórios",
                s.numero
            )),
            ConfirmationKind::DeleteInvoiceWithPayments,
        );
    }

    RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeleteInvoice)
}

fn cancel(s: &InvoiceSnapshot) -> RuleOutcome {
    match s.status {
        InvoiceStatus::Paga => RuleOutcome::new(
            ConfirmationVariant::block(
                format!("a fatura {} já foi paga", s.numero),
                Some(SuggestedAction::ReversePayment),
            ),
            ConfirmationKind::CancelClosedInvoice,
        ),
        InvoiceStatus::Cancelada => RuleOutcome::new(
            ConfirmationVariant::block(format!("a fatura {} já está cancelada", s.numero), None),
            ConfirmationKind::CancelClosedInvoice,
        ),
        _ if s.vencida => RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "a fatura {} está vencida desde {}; o cancelamento impacta os relatórios de inadimplência",
                s.numero,
                s.data_vencimento.format("%d/%m/%Y")
            )),
            ConfirmationKind::CancelOverdueInvoice,
        ),
        _ => RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::CancelInvoice),
    }
}
