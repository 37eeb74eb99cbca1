use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowId {
    LembreteVencimento,
    CobrancaVencidas,
    SincronizacaoFinanceira,
}

impl WorkflowId {
    /// Catalogue order; also the order of "run all active".
    pub const ALL: [WorkflowId; 3] = [
        WorkflowId::LembreteVencimento,
        WorkflowId::CobrancaVencidas,
        WorkflowId::SincronizacaoFinanceira,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowId::LembreteVencimento => "lembrete_vencimento",
            WorkflowId::CobrancaVencidas => "cobranca_vencidas",
            WorkflowId::SincronizacaoFinanceira => "sincronizacao_financeira",
        }
    }

    /// Action name sent to the host (`workflow_<id>`).
    pub fn action_name(self) -> String {
        format!("workflow_{}", self.as_str())
    }

    /// Correlation token for one dispatch.
    pub fn correlation(self, invoice_id: impl fmt::Display) -> String {
        format!("{}:{invoice_id}", self.as_str())
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowId {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| WorkflowError::Unknown(s.to_string()))
    }
}

/// A workflow as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: WorkflowId,
    pub nome: String,
    pub descricao: String,
    pub acao: String,
    pub ativo: bool,
}

impl WorkflowDefinition {
    /// Built-in definition; every workflow starts enabled.
    pub fn default_for(id: WorkflowId) -> Self {
        let (nome, descricao) = match id {
            WorkflowId::LembreteVencimento => (
                "Lembrete de Vencimento",
                "Dispara lembretes para faturas em aberto que vencem dentro da janela configurada.",
            ),
            WorkflowId::CobrancaVencidas => (
                "Cobrança de Faturas Vencidas",
                "Envia cobrança para faturas em atraso.",
            ),
            WorkflowId::SincronizacaoFinanceira => (
                "Sincronização Financeira",
                "Marca como vencidas no servidor as faturas em atraso.",
            ),
        };
        Self {
            id,
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            acao: id.action_name(),
            ativo: true,
        }
    }

    pub fn defaults() -> Vec<Self> {
        WorkflowId::ALL.into_iter().map(Self::default_for).collect()
    }
}
