//! Execution history, newest first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::definition::{WorkflowDefinition, WorkflowId};
use crate::result::WorkflowResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Sucesso,
    Falha,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: String,
    pub workflow_id: WorkflowId,
    pub workflow_nome: String,
    pub status: ExecutionStatus,
    pub inicio_execucao: DateTime<Utc>,
    pub fim_execucao: DateTime<Utc>,
    pub processados: u32,
    pub sucesso: u32,
    pub falhas: u32,
    pub mensagem: String,
}

impl ExecutionRecord {
    /// Any failed dispatch marks the whole run as `falha`.
    pub fn of_run(
        definition: &WorkflowDefinition,
        result: &WorkflowResult,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}_{}", definition.id, inicio.timestamp_millis()),
            workflow_id: definition.id,
            workflow_nome: definition.nome.clone(),
            status: if result.has_failures() {
                ExecutionStatus::Falha
            } else {
                ExecutionStatus::Sucesso
            },
            inicio_execucao: inicio,
            fim_execucao: fim,
            processados: result.processados,
            sucesso: result.sucesso,
            falhas: result.falhas,
            mensagem: result.mensagem.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowHistory {
    entries: VecDeque<ExecutionRecord>,
    limit: usize,
}

impl WorkflowHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Restores saved entries (newest first), dropping any beyond `limit`.
    pub fn restore(entries: Vec<ExecutionRecord>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        history.entries = entries.into_iter().take(limit).collect();
        history
    }

    pub fn push(&mut self, record: ExecutionRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.limit);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.entries.iter()
    }

    /// Most recent run of `workflow`.
    pub fn latest_for(&self, workflow: WorkflowId) -> Option<&ExecutionRecord> {
        self.entries.iter().find(|r| r.workflow_id == workflow)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
