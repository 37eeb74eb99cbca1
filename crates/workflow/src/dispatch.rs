//! One outbound action per eligible invoice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use billops_core::EntityKind;
use billops_invoicing::Invoice;
use billops_remote::RemoteApi;

use crate::definition::WorkflowId;
use crate::eligibility::eligible;
use crate::result::WorkflowResult;

/// How a single dispatch went, as reported by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Real,
    Simulated,
    Failed { reason: String },
}

#[derive(Clone)]
pub struct WorkflowDispatcher {
    remote: Arc<dyn RemoteApi>,
}

impl WorkflowDispatcher {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    /// E-mail template used by the mail-sending workflows.
    pub fn template(workflow: WorkflowId) -> Option<&'static str> {
        match workflow {
            WorkflowId::LembreteVencimento => Some("lembrete_vencimento"),
            WorkflowId::CobrancaVencidas => Some("cobranca_vencida"),
            WorkflowId::SincronizacaoFinanceira => None,
        }
    }

    pub async fn dispatch(&self, workflow: WorkflowId, invoice: &Invoice) -> DispatchOutcome {
        let invoice_id = invoice.invoice_id();
        let correlation = workflow.correlation(invoice_id);

        let outcome = match Self::template(workflow) {
            Some(template) => match self.remote.send_email(invoice_id, template, &correlation).await {
                Ok(dispatch) if dispatch.simulado => DispatchOutcome::Simulated,
                Ok(_) => DispatchOutcome::Real,
                Err(e) => DispatchOutcome::Failed {
                    reason: e.to_string(),
                },
            },
            // the overdue flag is pushed as data; the stored status is left alone
            None => match self
                .remote
                .update(
                    EntityKind::Invoice,
                    &invoice_id.to_string(),
                    json!({ "vencida": true }),
                )
                .await
            {
                Ok(_) => DispatchOutcome::Real,
                Err(e) => DispatchOutcome::Failed {
                    reason: e.to_string(),
                },
            },
        };

        match &outcome {
            DispatchOutcome::Failed { reason } => {
                tracing::warn!(%workflow, %correlation, %reason, "workflow dispatch failed")
            }
            other => tracing::debug!(%workflow, %correlation, outcome = ?other, "workflow dispatched"),
        }
        outcome
    }

    /// Dispatches to every eligible invoice, in order.
    pub async fn execute(
        &self,
        workflow: WorkflowId,
        invoices: &[Invoice],
        now: DateTime<Utc>,
        window_days: i64,
    ) -> WorkflowResult {
        let targets = eligible(workflow, invoices, now, window_days);
        let mut outcomes = Vec::with_capacity(targets.len());
        for invoice in targets {
            outcomes.push(self.dispatch(workflow, invoice).await);
        }
        WorkflowResult::from_outcomes(&outcomes)
    }
}
