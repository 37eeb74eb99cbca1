//! Per-kind safeguard rules.
//!
//! Each module maps `(snapshot, action)` to a variant and the prompt to show.
//! Non-destructive actions are handled here once for every kind.

mod contract;
mod invoice;
mod payable;
mod payment;
mod supplier;

use billops_core::EntityKind;

use crate::kind::ConfirmationKind;
use crate::snapshot::{EntitySnapshot, RequestedAction};
use crate::variant::ConfirmationVariant;

/// Result of a single rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub variant: ConfirmationVariant,
    /// `None` when no prompt is needed at all.
    pub kind: Option<ConfirmationKind>,
}

impl RuleOutcome {
    pub(crate) fn new(variant: ConfirmationVariant, kind: ConfirmationKind) -> Self {
        Self {
            variant,
            kind: Some(kind),
        }
    }

    pub(crate) fn silent() -> Self {
        Self {
            variant: ConfirmationVariant::Allow,
            kind: None,
        }
    }
}

pub fn evaluate(snapshot: &EntitySnapshot, action: RequestedAction) -> RuleOutcome {
    if action.is_non_destructive() {
        return RuleOutcome::silent();
    }

    let outcome = match snapshot {
        EntitySnapshot::Invoice(s) => invoice::evaluate(s, action),
        EntitySnapshot::Payment(s) => payment::evaluate(s, action),
        EntitySnapshot::Supplier(s) => supplier::evaluate(s, action),
        EntitySnapshot::Contract(s) => contract::evaluate(s, action),
        EntitySnapshot::Payable(s) => payable::evaluate(s, action),
    };

    outcome.unwrap_or_else(|| unsupported(snapshot.kind(), action))
}

fn unsupported(kind: EntityKind, action: RequestedAction) -> RuleOutcome {
    RuleOutcome::new(
        ConfirmationVariant::block(
            format!("a ação {} não se aplica a {}", action.as_str(), kind.noun()),
            None,
        ),
        ConfirmationKind::UnsupportedAction,
    )
}
