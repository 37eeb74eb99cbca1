use billops_parties::ContractStatus;

use super::RuleOutcome;
use crate::kind::ConfirmationKind;
use crate::snapshot::{ContractSnapshot, RequestedAction};
use crate::variant::{ConfirmationVariant, SuggestedAction};

pub(super) fn evaluate(s: &ContractSnapshot, action: RequestedAction) -> Option<RuleOutcome> {
    match action {
        RequestedAction::Delete => Some(delete(s)),
        RequestedAction::Cancel => Some(cancel(s)),
        _ => None,
    }
}

fn delete(s: &ContractSnapshot) -> RuleOutcome {
    if s.status == ContractStatus::Assinado {
        return RuleOutcome::new(
            ConfirmationVariant::block(
                format!(
                    "o contrato {} está assinado e tem valor jurídico",
                    s.numero
                ),
                Some(SuggestedAction::CancelInstead),
            ),
            ConfirmationKind::DeleteSignedContract,
        );
    }

    if s.faturas_vinculadas > 0 {
        return RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "o contrato {} possui {} fatura(s) vinculada(s); {}",
                s.numero,
                s.faturas_vinculadas,
                SuggestedAction::DeleteLinkedInvoicesFirst.description()
            )),
            ConfirmationKind::DeleteContractWithInvoices,
        );
    }

    RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeleteContract)
}

fn cancel(s: &ContractSnapshot) -> RuleOutcome {
    if s.status == ContractStatus::Cancelado {
        return RuleOutcome::new(
            ConfirmationVariant::block(format!("o contrato {} já está cancelado", s.numero), None),
            ConfirmationKind::CancelContract,
        );
    }
    RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::CancelContract)
}
