use super::RuleOutcome;
use crate::kind::ConfirmationKind;
use crate::snapshot::{RequestedAction, SupplierSnapshot};
use crate::variant::{ConfirmationVariant, SuggestedAction};

pub(super) fn evaluate(s: &SupplierSnapshot, action: RequestedAction) -> Option<RuleOutcome> {
    match action {
        RequestedAction::Delete => Some(delete(s)),
        RequestedAction::Deactivate => Some(deactivate(s)),
        _ => None,
    }
}

fn delete(s: &SupplierSnapshot) -> RuleOutcome {
    let deps = &s.dependencias;

    if deps.contratos_assinados > 0 {
        return RuleOutcome::new(
            ConfirmationVariant::block(
                format!(
                    "o fornecedor {} possui {} contrato(s) assinado(s)",
                    s.nome, deps.contratos_assinados
                ),
                Some(SuggestedAction::Deactivate),
            ),
            ConfirmationKind::DeleteSupplierWithSignedContracts,
        );
    }

    let mut loose = Vec::new();
    if deps.faturas_abertas > 0 {
        loose.push(format!("{} fatura(s) em aberto", deps.faturas_abertas));
    }
    if deps.contas_pagar_abertas > 0 {
        loose.push(format!("{} conta(s) a pagar em aberto", deps.contas_pagar_abertas));
    }
    if deps.contratos_nao_assinados() > 0 {
        loose.push(format!("{} contrato(s) não assinado(s)", deps.contratos_nao_assinados()));
    }

    if loose.is_empty() {
        RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeleteSupplier)
    } else {
        RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "o fornecedor {} possui {}",
                s.nome,
                loose.join(", ")
            )),
            ConfirmationKind::DeleteSupplierWithDependencies,
        )
    }
}

fn deactivate(s: &SupplierSnapshot) -> RuleOutcome {
    if s.dependencias.contas_pagar_abertas > 0 {
        return RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "o fornecedor {} possui {} conta(s) a pagar em aberto",
                s.nome, s.dependencias.contas_pagar_abertas
            )),
            ConfirmationKind::DeactivateSupplierWithPayables,
        );
    }
    RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeactivateSupplier)
}
