//! Registry, dispatcher and history driven together.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billops_core::{ConsoleConfig, Money};
use billops_invoicing::Invoice;
use billops_remote::RemoteApi;

use crate::definition::WorkflowId;
use crate::dispatch::WorkflowDispatcher;
use crate::eligibility::{is_due_soon, needs_collection};
use crate::error::WorkflowError;
use crate::history::{ExecutionRecord, WorkflowHistory};
use crate::registry::WorkflowRegistry;
use crate::result::WorkflowResult;

/// Dashboard figures over the current invoice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetrics {
    pub ativos: usize,
    pub faturas_vencendo: usize,
    pub faturas_vencidas: usize,
    pub valor_vencido: Money,
}

pub struct WorkflowEngine {
    dispatcher: WorkflowDispatcher,
    registry: WorkflowRegistry,
    history: WorkflowHistory,
    config: ConsoleConfig,
    clock: fn() -> DateTime<Utc>,
}

impl WorkflowEngine {
    pub fn new(remote: Arc<dyn RemoteApi>, config: ConsoleConfig) -> Self {
        Self {
            dispatcher: WorkflowDispatcher::new(remote),
            registry: WorkflowRegistry::default(),
            history: WorkflowHistory::new(config.workflow_history_limit),
            config,
            clock: Utc::now,
        }
    }

    pub fn with_registry(mut self, registry: WorkflowRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_history(mut self, history: WorkflowHistory) -> Self {
        self.history = history;
        self
    }

    /// Source of "now" for eligibility and history timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WorkflowRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &WorkflowHistory {
        &self.history
    }

    /// Runs one workflow over `invoices` and records it in the history.
    pub async fn run(
        &mut self,
        workflow: WorkflowId,
        invoices: &[Invoice],
    ) -> Result<WorkflowResult, WorkflowError> {
        let definition = self
            .registry
            .get(workflow)
            .cloned()
            .ok_or_else(|| WorkflowError::Unknown(workflow.to_string()))?;
        if !definition.ativo {
            tracing::warn!(%workflow, "refusing to run disabled workflow");
            return Err(WorkflowError::Disabled(workflow));
        }

        let inicio = (self.clock)();
        tracing::info!(%workflow, acao = %definition.acao, "workflow started");

        let result = self
            .dispatcher
            .execute(workflow, invoices, inicio, self.config.reminder_window_days)
            .await;

        let fim = (self.clock)();
        tracing::info!(
            %workflow,
            processados = result.processados,
            sucesso = result.sucesso,
            simulados = result.simulados,
            falhas = result.falhas,
            "workflow finished"
        );

        self.history
            .push(ExecutionRecord::of_run(&definition, &result, inicio, fim));
        Ok(result)
    }

    /// Runs every enabled workflow one after another, in catalogue order.
    pub async fn run_all_active(&mut self, invoices: &[Invoice]) -> Vec<(WorkflowId, WorkflowResult)> {
        let active: Vec<WorkflowId> = self.registry.active().map(|d| d.id).collect();
        let mut results = Vec::with_capacity(active.len());
        for workflow in active {
            match self.run(workflow, invoices).await {
                Ok(result) => results.push((workflow, result)),
                Err(e) => tracing::warn!(%workflow, error = %e, "workflow skipped"),
            }
        }
        results
    }

    pub fn metrics(&self, invoices: &[Invoice]) -> WorkflowMetrics {
        let now = (self.clock)();
        let window = self.config.reminder_window_days;
        let overdue: Vec<&Invoice> = invoices.iter().filter(|i| needs_collection(i, now)).collect();

        WorkflowMetrics {
            ativos: self.registry.active().count(),
            faturas_vencendo: invoices.iter().filter(|i| is_due_soon(i, now, window)).count(),
            faturas_vencidas: overdue.len(),
            valor_vencido: overdue.iter().map(|i| i.valor_total()).sum(),
        }
    }
}
