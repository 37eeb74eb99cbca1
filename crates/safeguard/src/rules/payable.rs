use billops_parties::PayableStatus;

use super::RuleOutcome;
use crate::kind::ConfirmationKind;
use crate::snapshot::{PayableSnapshot, RequestedAction};
use crate::variant::{ConfirmationVariant, SuggestedAction};

pub(super) fn evaluate(s: &PayableSnapshot, action: RequestedAction) -> Option<RuleOutcome> {
    match action {
        RequestedAction::Delete => Some(delete(s)),
        RequestedAction::Cancel => Some(cancel(s)),
        RequestedAction::MarkPaid => Some(mark_paid(s)),
        _ => None,
    }
}

fn delete(s: &PayableSnapshot) -> RuleOutcome {
    if s.status == PayableStatus::Pago {
        return RuleOutcome::new(
            ConfirmationVariant::block(
                format!("a conta {} já foi paga", s.numero),
                Some(SuggestedAction::CancelInstead),
            ),
            ConfirmationKind::DeletePaidPayable,
        );
    }
    if s.parcialmente_paga {
        return RuleOutcome::new(
            ConfirmationVariant::warn(format!(
                "a conta {} já teve {} pago de {}",
                s.numero, s.valor_pago, s.valor_total
            )),
            ConfirmationKind::DeletePartiallyPaidPayable,
        );
    }
    RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::DeletePayable)
}

fn cancel(s: &PayableSnapshot) -> RuleOutcome {
    match s.status {
        PayableStatus::Pago | PayableStatus::Cancelado => RuleOutcome::new(
            ConfirmationVariant::block(
                format!("a conta {} já está {}", s.numero, s.status.label().to_lowercase()),
                None,
            ),
            ConfirmationKind::CancelPayable,
        ),
        _ => RuleOutcome::new(ConfirmationVariant::Allow, ConfirmationKind::CancelPayable),
    }
}

/// Mirrors the bulk eligibility filter so single-item calls agree with it.
fn mark_paid(s: &PayableSnapshot) -> RuleOutcome {
    if matches!(s.status, PayableStatus::Pago | PayableStatus::Cancelado) {
        return RuleOutcome {
            variant: ConfirmationVariant::block(
                format!("a conta {} já está {}", s.numero, s.status.label().to_lowercase()),
                None,
            ),
            kind: None,
        };
    }
    if s.aguardando_aprovacao {
        return RuleOutcome {
            variant: ConfirmationVariant::block(
                format!("a conta {} aguarda aprovação", s.numero),
                None,
            ),
            kind: None,
        };
    }
    RuleOutcome::silent()
}
