//! Confirmation prompt catalogue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Prompt template to render for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    DeleteInvoice,
    DeletePaidInvoice,
    DeleteInvoiceWithPayments,
    DeleteMultipleInvoices,
    CancelInvoice,
    CancelOverdueInvoice,
    CancelClosedInvoice,
    DeleteContract,
    DeleteSignedContract,
    DeleteContractWithInvoices,
    CancelContract,
    DeleteSupplier,
    DeleteSupplierWithSignedContracts,
    DeleteSupplierWithDependencies,
    DeactivateSupplier,
    DeactivateSupplierWithPayables,
    DeletePayable,
    DeletePaidPayable,
    DeletePartiallyPaidPayable,
    CancelPayable,
    DeletePayment,
    DeleteApprovedPayment,
    ReversePayment,
    DeleteMultipleItems,
    UnsupportedAction,
}

impl ConfirmationKind {
    pub fn severity(self) -> Severity {
        use ConfirmationKind::*;
        match self {
            DeletePaidInvoice
            | DeleteInvoiceWithPayments
            | CancelOverdueInvoice
            | CancelClosedInvoice
            | DeleteSignedContract
            | DeleteContractWithInvoices
            | DeleteSupplierWithSignedContracts
            | DeletePaidPayable
            | DeleteApprovedPayment
            | ReversePayment
            | UnsupportedAction => Severity::Error,
            DeactivateSupplier => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Prompt title.
    pub fn title(self) -> &'static str {
        use ConfirmationKind::*;
        match self {
            DeleteInvoice => "Excluir Fatura",
            DeletePaidInvoice => "Não é Possível Excluir",
            DeleteInvoiceWithPayments => "Fatura com Pagamentos",
            DeleteMultipleInvoices => "Excluir Múltiplas Faturas",
            CancelInvoice => "Cancelar Fatura",
            CancelOverdueInvoice => "Cancelar Fatura Vencida",
            CancelClosedInvoice => "Não é Possível Cancelar",
            DeleteContract => "Excluir Contrato",
            DeleteSignedContract => "Contrato Já Assinado",
            DeleteContractWithInvoices => "Contrato com Faturas",
            CancelContract => "Cancelar Contrato",
            DeleteSupplier => "Excluir Fornecedor",
            DeleteSupplierWithSignedContracts => "Fornecedor com Contratos Assinados",
            DeleteSupplierWithDependencies => "Fornecedor com Vínculos",
            DeactivateSupplier => "Desativar Fornecedor",
            DeactivateSupplierWithPayables => "Fornecedor com Contas em Aberto",
            DeletePayable => "Excluir Conta a Pagar",
            DeletePaidPayable => "Conta Já Paga",
            DeletePartiallyPaidPayable => "Conta Parcialmente Paga",
            CancelPayable => "Cancelar Conta a Pagar",
            DeletePayment => "Excluir Pagamento",
            DeleteApprovedPayment => "Pagamento Aprovado",
            ReversePayment => "Estornar Pagamento",
            DeleteMultipleItems => "Excluir Itens Selecionados",
            UnsupportedAction => "Ação Indisponível",
        }
    }
}
