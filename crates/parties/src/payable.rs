use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use billops_core::{Entity, Money, PayableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayableStatus {
    EmAberto,
    Agendado,
    Pago,
    Vencido,
    Cancelado,
}

impl PayableStatus {
    pub fn label(self) -> &'static str {
        match self {
            PayableStatus::EmAberto => "Em aberto",
            PayableStatus::Agendado => "Agendado",
            PayableStatus::Pago => "Pago",
            PayableStatus::Vencido => "Vencido",
            PayableStatus::Cancelado => "Cancelado",
        }
    }
}

/// Accounts-payable entry (conta a pagar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    pub id: PayableId,
    pub numero: String,
    pub valor_total: Money,
    #[serde(default)]
    pub valor_pago: Money,
    pub data_vencimento: NaiveDate,
    pub status: PayableStatus,
    #[serde(default)]
    pub aguardando_aprovacao: bool,
    #[serde(default)]
    pub fornecedor: Option<String>,
}

impl Payable {
    pub fn new(
        id: PayableId,
        numero: impl Into<String>,
        valor_total: Money,
        data_vencimento: NaiveDate,
    ) -> Self {
        Self {
            id,
            numero: numero.into(),
            valor_total,
            valor_pago: Money::ZERO,
            data_vencimento,
            status: PayableStatus::EmAberto,
            aguardando_aprovacao: false,
            fornecedor: None,
        }
    }

    pub fn with_status(mut self, status: PayableStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_valor_pago(mut self, valor: Money) -> Self {
        self.valor_pago = valor;
        self
    }

    pub fn with_fornecedor(mut self, nome: impl Into<String>) -> Self {
        self.fornecedor = Some(nome.into());
        self
    }

    pub fn awaiting_approval(mut self) -> Self {
        self.aguardando_aprovacao = true;
        self
    }

    pub fn is_paid(&self) -> bool {
        self.status == PayableStatus::Pago
    }

    /// Some money moved but the entry is not settled.
    pub fn is_partially_paid(&self) -> bool {
        !self.is_paid() && self.valor_pago.is_positive() && self.valor_pago < self.valor_total
    }

    /// Bulk "mark paid" skips settled, cancelled and pending-approval entries.
    pub fn is_eligible_for_mark_paid(&self) -> bool {
        !matches!(self.status, PayableStatus::Pago | PayableStatus::Cancelado)
            && !self.aguardando_aprovacao
    }
}

impl Entity for Payable {
    type Id = PayableId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_ref(&self) -> String {
        self.numero.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payable() -> Payable {
        Payable::new(
            PayableId::from_u128(1),
            "CP-001",
            Money::from_units(900),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        )
    }

    #[test]
    fn mark_paid_eligibility() {
        assert!(payable().is_eligible_for_mark_paid());
        assert!(payable().with_status(PayableStatus::Vencido).is_eligible_for_mark_paid());
        assert!(!payable().with_status(PayableStatus::Pago).is_eligible_for_mark_paid());
        assert!(!payable().with_status(PayableStatus::Cancelado).is_eligible_for_mark_paid());
        assert!(!payable().awaiting_approval().is_eligible_for_mark_paid());
    }

    #[test]
    fn partial_payment_marker() {
        assert!(!payable().is_partially_paid());
        assert!(payable().with_valor_pago(Money::from_units(100)).is_partially_paid());
        assert!(
            !payable()
                .with_valor_pago(Money::from_units(900))
                .with_status(PayableStatus::Pago)
                .is_partially_paid()
        );
    }

    #[test]
    fn status_wire_value() {
        assert_eq!(
            serde_json::to_value(PayableStatus::EmAberto).unwrap(),
            "em_aberto"
        );
    }
}
