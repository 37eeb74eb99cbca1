use serde::{Deserialize, Serialize};

/// Kinds of records the console acts on (one remote collection each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Invoice,
    Payment,
    Supplier,
    Contract,
    Payable,
}

impl EntityKind {
    /// Resource path segment on the remote API.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Invoice => "faturas",
            EntityKind::Payment => "pagamentos",
            EntityKind::Supplier => "fornecedores",
            EntityKind::Contract => "contratos",
            EntityKind::Payable => "contas-pagar",
        }
    }

    /// Singular noun used in prompts and messages.
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Invoice => "fatura",
            EntityKind::Payment => "pagamento",
            EntityKind::Supplier => "fornecedor",
            EntityKind::Contract => "contrato",
            EntityKind::Payable => "conta a pagar",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.collection())
    }
}
