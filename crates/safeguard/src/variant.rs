use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the operator can do instead of a blocked action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    CancelInstead,
    ReversePayment,
    Deactivate,
    DeleteLinkedInvoicesFirst,
}

impl SuggestedAction {
    pub fn description(self) -> &'static str {
        match self {
            SuggestedAction::CancelInstead => "cancele em vez de excluir",
            SuggestedAction::ReversePayment => "estorne o pagamento",
            SuggestedAction::Deactivate => "marque como inativo",
            SuggestedAction::DeleteLinkedInvoicesFirst => "exclua primeiro as faturas vinculadas",
        }
    }
}

/// Closed set of confirmation outcomes, ordered from least to most strict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ConfirmationVariant {
    Allow,
    AllowWithWarning {
        warning: String,
    },
    Block {
        reason: String,
        alternative: Option<SuggestedAction>,
    },
}

impl ConfirmationVariant {
    pub fn warn(warning: impl Into<String>) -> Self {
        Self::AllowWithWarning {
            warning: warning.into(),
        }
    }

    pub fn block(reason: impl Into<String>, alternative: Option<SuggestedAction>) -> Self {
        Self::Block {
            reason: reason.into(),
            alternative,
        }
    }

    pub fn strictness(&self) -> u8 {
        match self {
            ConfirmationVariant::Allow => 0,
            ConfirmationVariant::AllowWithWarning { .. } => 1,
            ConfirmationVariant::Block { .. } => 2,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ConfirmationVariant::Block { .. })
    }

    /// The stricter of the two; ties keep `self`.
    pub fn stricter(self, other: Self) -> Self {
        if other.strictness() > self.strictness() {
            other
        } else {
            self
        }
    }

    /// Converts a block into the typed rejection callers propagate.
    pub fn into_blocked(self) -> Option<SafeguardBlocked> {
        match self {
            ConfirmationVariant::Block {
                reason,
                alternative,
            } => Some(SafeguardBlocked {
                reason,
                alternative,
            }),
            _ => None,
        }
    }
}

/// The action was refused before any remote call was made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("blocked by safeguard: {reason}")]
pub struct SafeguardBlocked {
    pub reason: String,
    pub alternative: Option<SuggestedAction>,
}
