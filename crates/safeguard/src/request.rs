//! Confirmation requests and the presenter that answers them.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::resolver::{BatchResolution, resolve_batch};
use crate::snapshot::{EntitySnapshot, RequestedAction};
use crate::variant::SafeguardBlocked;

/// Operator's answer to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Confirm,
    Dismiss,
}

/// A pending destructive action waiting on the operator.
///
/// Built when the action is requested and consumed right away; never queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub action: RequestedAction,
    pub subjects: Vec<EntitySnapshot>,
    pub resolution: BatchResolution,
}

impl ConfirmationRequest {
    pub fn single(snapshot: EntitySnapshot, action: RequestedAction) -> Self {
        Self::batch(vec![snapshot], action)
    }

    pub fn batch(subjects: Vec<EntitySnapshot>, action: RequestedAction) -> Self {
        let resolution = resolve_batch(&subjects, action);
        Self {
            action,
            subjects,
            resolution,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.resolution.is_blocked()
    }

    pub fn requires_prompt(&self) -> bool {
        self.resolution.kind.is_some()
    }

    /// Whether the action may run given the operator's answer.
    ///
    /// A blocked request never proceeds; its prompt is informational.
    pub fn proceed(&self, decision: Decision) -> Result<bool, SafeguardBlocked> {
        if let Some(blocked) = self.resolution.blocked() {
            return Err(blocked);
        }
        Ok(decision == Decision::Confirm)
    }
}

/// UI collaborator that shows the prompt and returns the operator's answer.
#[async_trait]
pub trait ConfirmationPresenter: Send + Sync {
    async fn decide(&self, request: &ConfirmationRequest) -> Decision;
}

/// Presenter with a fixed answer that records every request it saw.
#[derive(Debug)]
pub struct ScriptedPresenter {
    answer: Decision,
    seen: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedPresenter {
    pub fn confirming() -> Self {
        Self::answering(Decision::Confirm)
    }

    pub fn dismissing() -> Self {
        Self::answering(Decision::Dismiss)
    }

    pub fn answering(answer: Decision) -> Self {
        Self {
            answer,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<ConfirmationRequest> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ConfirmationPresenter for ScriptedPresenter {
    async fn decide(&self, request: &ConfirmationRequest) -> Decision {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InvoiceSnapshot;
    use billops_core::{InvoiceId, Money};
    use billops_invoicing::InvoiceStatus;
    use chrono::NaiveDate;

    fn snapshot(status: InvoiceStatus) -> EntitySnapshot {
        EntitySnapshot::Invoice(InvoiceSnapshot {
            id: InvoiceId::from_u128(1),
            numero: "FT-1".to_string(),
            status,
            valor_total: Money::from_units(10),
            valor_pago: Money::ZERO,
            tem_pagamentos: false,
            vencida: false,
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cliente: None,
        })
    }

    #[tokio::test]
    async fn presenter_answer_controls_proceeding() {
        let request = ConfirmationRequest::single(snapshot(InvoiceStatus::Pendente), RequestedAction::Delete);
        assert!(request.requires_prompt());

        let yes = ScriptedPresenter::confirming();
        assert_eq!(request.proceed(yes.decide(&request).await), Ok(true));

        let no = ScriptedPresenter::dismissing();
        assert_eq!(request.proceed(no.decide(&request).await), Ok(false));
        assert_eq!(no.seen().len(), 1);
    }

    #[test]
    fn blocked_request_never_proceeds() {
        let request = ConfirmationRequest::single(snapshot(InvoiceStatus::Paga), RequestedAction::Delete);
        assert!(request.is_blocked());
        assert!(request.proceed(Decision::Confirm).is_err());
    }
}
