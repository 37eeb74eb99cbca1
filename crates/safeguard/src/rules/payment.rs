use billops_invoicing::PaymentStatus;

use super::RuleOutcome;
use crate::kind::ConfirmationKind;
use crate::snapshot::{PaymentSnapshot, RequestedAction};
use crate::variant::{ConfirmationVariant, SuggestedAction};

pub(super) fn evaluate(s: &PaymentSnapshot, action: RequestedAction) -> Option<RuleOutcome> {
    let approved = s.status == PaymentStatus::Aprovado;

    let outcome = match action {
        RequestedAction::Reverse if approved => RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "o estorno de {} reverte o pagamento e altera o status da fatura",
                s.valor
            )),
            ConfirmationKind::ReversePayment,
        ),
        RequestedAction::Reverse => RuleOutcome::new(
            ConfirmationVariant::block("apenas pagamentos aprovados podem ser estornados", None),
            ConfirmationKind::ReversePayment,
        ),
        RequestedAction::Delete if approved => RuleOutcome::new(
            ConfirmationVariant::block(
                "pagamentos aprovados não podem ser excluídos",
                Some(SuggestedAction::ReversePayment),
            ),
            ConfirmationKind::DeleteApprovedPayment,
        ),
        RequestedAction::Delete => {
            RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeletePayment)
        }
        _ => return None,
    };
    Some(outcome)
}
