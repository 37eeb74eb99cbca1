use serde::{Deserialize, Serialize};

use billops_core::{ContractId, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Rascunho,
    Enviado,
    Assinado,
    Cancelado,
}

impl ContractStatus {
    pub fn label(self) -> &'static str {
        match self {
            ContractStatus::Rascunho => "Rascunho",
            ContractStatus::Enviado => "Enviado",
            ContractStatus::Assinado => "Assinado",
            ContractStatus::Cancelado => "Cancelado",
        }
    }
}

/// Service contract. A signed contract is a hard dependency of its supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub numero: String,
    pub status: ContractStatus,
    #[serde(default)]
    pub faturas_vinculadas: u32,
    #[serde(default)]
    pub contraparte: Option<String>,
}

impl Contract {
    pub fn new(id: ContractId, numero: impl Into<String>, status: ContractStatus) -> Self {
        Self {
            id,
            numero: numero.into(),
            status,
            faturas_vinculadas: 0,
            contraparte: None,
        }
    }

    pub fn with_faturas_vinculadas(mut self, count: u32) -> Self {
        self.faturas_vinculadas = count;
        self
    }

    pub fn with_contraparte(mut self, nome: impl Into<String>) -> Self {
        self.contraparte = Some(nome.into());
        self
    }

    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Assinado
    }

    pub fn has_linked_invoices(&self) -> bool {
        self.faturas_vinculadas > 0
    }
}

impl Entity for Contract {
    type Id = ContractId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_ref(&self) -> String {
        self.numero.clone()
    }
}
