use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use billops_core::{Aggregate, AggregateRoot, DomainError, DomainEvent, Entity, InvoiceId, Money};

use crate::aggregates::{MonetaryAggregates, is_overdue, recompute_terms};
use crate::error::LifecycleError;
use crate::lifecycle::{TransitionOrigin, check_transition};
use crate::payment::{Payment, PaymentStatus};
use crate::settlement::{Receivable, SettlementRecord, SettlementSource, trim_history};

/// Invoice status lifecycle.
///
/// `Paga` and `Cancelada` are terminal. `Vencida` is normally a derived view
/// (see [`Invoice::is_overdue`]); it only appears as a stored value on records
/// loaded from the remote API, where it behaves like any unpaid status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pendente,
    Enviada,
    ParcialmentePaga,
    Paga,
    Vencida,
    Cancelada,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 6] = [
        InvoiceStatus::Pendente,
        InvoiceStatus::Enviada,
        InvoiceStatus::ParcialmentePaga,
        InvoiceStatus::Paga,
        InvoiceStatus::Vencida,
        InvoiceStatus::Cancelada,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Paga | InvoiceStatus::Cancelada)
    }

    /// Statuses that still expect money from the client.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            InvoiceStatus::Pendente | InvoiceStatus::Enviada | InvoiceStatus::ParcialmentePaga
        )
    }

    /// Human label used in confirmation prompts.
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Pendente => "Pendente",
            InvoiceStatus::Enviada => "Enviada",
            InvoiceStatus::ParcialmentePaga => "Parcialmente paga",
            InvoiceStatus::Paga => "Paga",
            InvoiceStatus::Vencida => "Vencida",
            InvoiceStatus::Cancelada => "Cancelada",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InvoiceStatus::Pendente => "PENDENTE",
            InvoiceStatus::Enviada => "ENVIADA",
            InvoiceStatus::ParcialmentePaga => "PARCIALMENTE_PAGA",
            InvoiceStatus::Paga => "PAGA",
            InvoiceStatus::Vencida => "VENCIDA",
            InvoiceStatus::Cancelada => "CANCELADA",
        };
        f.write_str(s)
    }
}

/// Billing type (tipo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Unica,
    Recorrente,
    Parcela,
    Adicional,
}

/// Aggregate root: Invoice (fatura).
///
/// `valor_pago` and `valor_restante` are only ever written by reconciliation
/// events; on rehydration they are recomputed from the payment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InvoiceRecord")]
pub struct Invoice {
    id: InvoiceId,
    numero: String,
    valor_total: Money,
    valor_pago: Money,
    valor_restante: Money,
    data_emissao: NaiveDate,
    data_vencimento: NaiveDate,
    data_pagamento: Option<DateTime<Utc>>,
    data_envio: Option<DateTime<Utc>>,
    status: InvoiceStatus,
    tipo: InvoiceType,
    link_pagamento: Option<String>,
    cliente: Option<String>,
    observacoes: Option<String>,
    pagamentos: Vec<Payment>,
    baixas_financeiras: Vec<SettlementRecord>,
    version: u64,
    #[serde(skip)]
    created: bool,
}

impl Invoice {
    /// Empty, not-yet-created aggregate (target of a `Create` command).
    pub fn empty(id: InvoiceId) -> Self {
        Self {
            id,
            numero: String::new(),
            valor_total: Money::ZERO,
            valor_pago: Money::ZERO,
            valor_restante: Money::ZERO,
            data_emissao: NaiveDate::MIN,
            data_vencimento: NaiveDate::MIN,
            data_pagamento: None,
            data_envio: None,
            status: InvoiceStatus::Pendente,
            tipo: InvoiceType::Unica,
            link_pagamento: None,
            cliente: None,
            observacoes: None,
            pagamentos: Vec::new(),
            baixas_financeiras: Vec::new(),
            version: 0,
            created: false,
        }
    }

    /// Explicit creation action.
    pub fn create(cmd: CreateInvoice) -> Result<Self, LifecycleError> {
        let mut invoice = Invoice::empty(cmd.invoice_id);
        billops_core::execute(&mut invoice, &InvoiceCommand::Create(cmd))?;
        Ok(invoice)
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.id
    }

    pub fn numero(&self) -> &str {
        &self.numero
    }

    pub fn valor_total(&self) -> Money {
        self.valor_total
    }

    pub fn valor_pago(&self) -> Money {
        self.valor_pago
    }

    pub fn valor_restante(&self) -> Money {
        self.valor_restante
    }

    pub fn data_emissao(&self) -> NaiveDate {
        self.data_emissao
    }

    pub fn data_vencimento(&self) -> NaiveDate {
        self.data_vencimento
    }

    pub fn data_pagamento(&self) -> Option<DateTime<Utc>> {
        self.data_pagamento
    }

    pub fn data_envio(&self) -> Option<DateTime<Utc>> {
        self.data_envio
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn tipo(&self) -> InvoiceType {
        self.tipo
    }

    pub fn link_pagamento(&self) -> Option<&str> {
        self.link_pagamento.as_deref()
    }

    pub fn cliente(&self) -> Option<&str> {
        self.cliente.as_deref()
    }

    pub fn observacoes(&self) -> Option<&str> {
        self.observacoes.as_deref()
    }

    pub fn payments(&self) -> &[Payment] {
        &self.pagamentos
    }

    pub fn settlements(&self) -> &[SettlementRecord] {
        &self.baixas_financeiras
    }

    /// Payments that are still attached (pending or approved).
    pub fn has_payments(&self) -> bool {
        self.pagamentos
            .iter()
            .any(|p| p.status != PaymentStatus::Rejeitado)
    }

    /// Overdue view, always re-derived from the due date and `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.status, self.data_vencimento, now)
    }

    pub fn receivable(&self) -> Receivable {
        Receivable::of(self)
    }

    pub fn find_payment(&self, transacao_id: &str) -> Option<&Payment> {
        self.pagamentos.iter().find(|p| p.transacao_id == transacao_id)
    }

    pub(crate) fn trim_settlements(&mut self, limit: usize) {
        trim_history(&mut self.baixas_financeiras, limit);
    }

    /// Status an invoice with no approved money falls back to.
    fn unpaid_status(&self) -> InvoiceStatus {
        if self.data_envio.is_some() {
            InvoiceStatus::Enviada
        } else {
            InvoiceStatus::Pendente
        }
    }

    fn settled_status(&self, aggregates: &MonetaryAggregates) -> InvoiceStatus {
        if aggregates.valor_restante.is_zero() {
            InvoiceStatus::Paga
        } else if aggregates.valor_pago.is_positive() {
            InvoiceStatus::ParcialmentePaga
        } else if matches!(
            self.status,
            InvoiceStatus::ParcialmentePaga | InvoiceStatus::Paga
        ) {
            self.unpaid_status()
        } else {
            self.status
        }
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_ref(&self) -> String {
        self.numero.clone()
    }
}

/// Wire shape of an invoice as returned by the remote API.
///
/// Any `valorPago`/`valorRestante` sent by the server are ignored: the
/// aggregates are recomputed from `pagamentos`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub numero: String,
    pub valor_total: Money,
    pub data_emissao: NaiveDate,
    pub data_vencimento: NaiveDate,
    #[serde(default)]
    pub data_pagamento: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_envio: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
    pub tipo: InvoiceType,
    #[serde(default)]
    pub link_pagamento: Option<String>,
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub pagamentos: Vec<Payment>,
    #[serde(default)]
    pub baixas_financeiras: Vec<SettlementRecord>,
    #[serde(default)]
    pub version: u64,
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = LifecycleError;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        // The overdue flag is not stored; any instant works for the money part.
        let aggregates = recompute_terms(
            record.valor_total,
            record.status,
            record.data_vencimento,
            &record.pagamentos,
            DateTime::<Utc>::UNIX_EPOCH,
        )?;

        Ok(Invoice {
            id: record.id,
            numero: record.numero,
            valor_total: record.valor_total,
            valor_pago: aggregates.valor_pago,
            valor_restante: aggregates.valor_restante,
            data_emissao: record.data_emissao,
            data_vencimento: record.data_vencimento,
            data_pagamento: record.data_pagamento,
            data_envio: record.data_envio,
            status: record.status,
            tipo: record.tipo,
            link_pagamento: record.link_pagamento,
            cliente: record.cliente,
            observacoes: record.observacoes,
            pagamentos: record.pagamentos,
            baixas_financeiras: record.baixas_financeiras,
            version: record.version,
            created: true,
        })
    }
}

/// Command: create an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub invoice_id: InvoiceId,
    pub numero: String,
    pub valor_total: Money,
    pub data_emissao: NaiveDate,
    pub data_vencimento: NaiveDate,
    pub tipo: InvoiceType,
    pub cliente: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceCommand {
    Create(CreateInvoice),
    /// Invoice dispatched to the client (`PENDENTE -> ENVIADA`).
    MarkSent { occurred_at: DateTime<Utc> },
    Cancel {
        motivo: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    ApplyPayment {
        payment: Payment,
        correlation_id: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    /// Gateway/manual decision on a pending payment.
    ProcessPayment {
        transacao_id: String,
        novo_status: PaymentStatus,
        occurred_at: DateTime<Utc>,
    },
    /// Estorno: flips an approved payment to `rejeitado`.
    ReversePayment {
        transacao_id: String,
        motivo: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    AttachPaymentLink {
        link: String,
        occurred_at: DateTime<Utc>,
    },
}

/// How a reconciliation step changed the payment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentChange {
    Appended { payment: Payment },
    StatusChanged {
        transacao_id: String,
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvoiceEvent {
    InvoiceCreated {
        invoice: CreateInvoice,
    },
    InvoiceSent {
        occurred_at: DateTime<Utc>,
    },
    PaymentReconciled {
        change: PaymentChange,
        aggregates: MonetaryAggregates,
        status: InvoiceStatus,
        settlement: SettlementRecord,
        occurred_at: DateTime<Utc>,
    },
    /// `valor_ja_pago` is the approved amount at cancellation time; any refund
    /// handling hangs off this figure.
    InvoiceCancelled {
        motivo: Option<String>,
        valor_ja_pago: Money,
        occurred_at: DateTime<Utc>,
    },
    PaymentLinkAttached {
        link: String,
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent for InvoiceEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InvoiceEvent::InvoiceCreated { .. } => "invoicing.invoice.created",
            InvoiceEvent::InvoiceSent { .. } => "invoicing.invoice.sent",
            InvoiceEvent::PaymentReconciled { .. } => "invoicing.invoice.payment_reconciled",
            InvoiceEvent::InvoiceCancelled { .. } => "invoicing.invoice.cancelled",
            InvoiceEvent::PaymentLinkAttached { .. } => "invoicing.invoice.payment_link_attached",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InvoiceEvent::InvoiceCreated { invoice } => invoice.occurred_at,
            InvoiceEvent::InvoiceSent { occurred_at }
            | InvoiceEvent::PaymentReconciled { occurred_at, .. }
            | InvoiceEvent::InvoiceCancelled { occurred_at, .. }
            | InvoiceEvent::PaymentLinkAttached { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Invoice {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = LifecycleError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvoiceEvent::InvoiceCreated { invoice } => {
                self.id = invoice.invoice_id;
                self.numero = invoice.numero.clone();
                self.valor_total = invoice.valor_total;
                self.valor_pago = Money::ZERO;
                self.valor_restante = invoice.valor_total;
                self.data_emissao = invoice.data_emissao;
                self.data_vencimento = invoice.data_vencimento;
                self.tipo = invoice.tipo;
                self.cliente = invoice.cliente.clone();
                self.status = InvoiceStatus::Pendente;
                self.created = true;
            }
            InvoiceEvent::InvoiceSent { occurred_at } => {
                self.status = InvoiceStatus::Enviada;
                self.data_envio = Some(*occurred_at);
            }
            InvoiceEvent::PaymentReconciled {
                change,
                aggregates,
                status,
                settlement,
                occurred_at,
            } => {
                match change {
                    PaymentChange::Appended { payment } => self.pagamentos.push(payment.clone()),
                    PaymentChange::StatusChanged { transacao_id, to, .. } => {
                        if let Some(p) = self
                            .pagamentos
                            .iter_mut()
                            .find(|p| &p.transacao_id == transacao_id)
                        {
                            p.status = *to;
                        }
                    }
                }

                self.valor_pago = aggregates.valor_pago;
                self.valor_restante = aggregates.valor_restante;

                if *status == InvoiceStatus::Paga {
                    if self.status != InvoiceStatus::Paga {
                        self.data_pagamento = Some(*occurred_at);
                    }
                } else {
                    self.data_pagamento = None;
                }
                self.status = *status;
                self.baixas_financeiras.push(settlement.clone());
            }
            InvoiceEvent::InvoiceCancelled { motivo, .. } => {
                self.status = InvoiceStatus::Cancelada;
                if let Some(motivo) = motivo {
                    let note = format!("Cancelada: {motivo}");
                    self.observacoes = Some(match self.observacoes.take() {
                        Some(existing) if !existing.is_empty() => format!("{existing}\n\n{note}"),
                        _ => note,
                    });
                }
            }
            InvoiceEvent::PaymentLinkAttached { link, .. } => {
                self.link_pagamento = Some(link.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::Create(cmd) => self.handle_create(cmd),
            InvoiceCommand::MarkSent { occurred_at } => self.handle_mark_sent(*occurred_at),
            InvoiceCommand::Cancel {
                motivo,
                occurred_at,
            } => self.handle_cancel(motivo.clone(), *occurred_at),
            InvoiceCommand::ApplyPayment {
                payment,
                correlation_id,
                occurred_at,
            } => self.handle_apply_payment(payment, correlation_id.clone(), *occurred_at),
            InvoiceCommand::ProcessPayment {
                transacao_id,
                novo_status,
                occurred_at,
            } => self.handle_process_payment(transacao_id, *novo_status, *occurred_at),
            InvoiceCommand::ReversePayment {
                transacao_id,
                occurred_at,
                ..
            } => self.handle_reverse_payment(transacao_id, *occurred_at),
            InvoiceCommand::AttachPaymentLink { link, occurred_at } => {
                self.handle_attach_link(link, *occurred_at)
            }
        }
    }
}

impl Invoice {
    fn ensure_created(&self) -> Result<(), LifecycleError> {
        if !self.created {
            return Err(DomainError::not_found(format!("invoice {}", self.id)).into());
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateInvoice) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        if self.created {
            return Err(DomainError::invariant("invoice already exists").into());
        }
        if cmd.numero.trim().is_empty() {
            return Err(DomainError::validation("invoice numero must not be empty").into());
        }
        if !cmd.valor_total.is_positive() {
            return Err(DomainError::validation("invoice valorTotal must be positive").into());
        }
        if cmd.data_vencimento < cmd.data_emissao {
            return Err(DomainError::validation(
                "invoice dataVencimento must not precede dataEmissao",
            )
            .into());
        }

        Ok(vec![InvoiceEvent::InvoiceCreated {
            invoice: cmd.clone(),
        }])
    }

    fn handle_mark_sent(&self, at: DateTime<Utc>) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;
        check_transition(self.status, InvoiceStatus::Enviada, TransitionOrigin::User)?;
        Ok(vec![InvoiceEvent::InvoiceSent { occurred_at: at }])
    }

    fn handle_cancel(
        &self,
        motivo: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;
        check_transition(self.status, InvoiceStatus::Cancelada, TransitionOrigin::User)?;
        Ok(vec![InvoiceEvent::InvoiceCancelled {
            motivo,
            valor_ja_pago: self.valor_pago,
            occurred_at: at,
        }])
    }

    fn handle_apply_payment(
        &self,
        payment: &Payment,
        correlation_id: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;

        if payment.fatura_id != self.id {
            return Err(DomainError::invariant("payment belongs to another invoice").into());
        }
        if self.find_payment(&payment.transacao_id).is_some() {
            return Err(LifecycleError::DuplicatePaymentReplay {
                transacao_id: payment.transacao_id.clone(),
            });
        }
        if !payment.valor.is_positive() {
            return Err(DomainError::validation("payment valor must be positive").into());
        }
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "cannot apply payment to a {} invoice",
                self.status
            ))
            .into());
        }

        let mut payments = self.pagamentos.clone();
        payments.push(payment.clone());

        let movimento = if payment.is_approved() {
            payment.valor
        } else {
            Money::ZERO
        };

        self.reconcile(
            payments,
            PaymentChange::Appended {
                payment: payment.clone(),
            },
            SettlementSource::Payment,
            movimento,
            correlation_id,
            at,
        )
    }

    fn handle_process_payment(
        &self,
        transacao_id: &str,
        novo_status: PaymentStatus,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;

        if novo_status == PaymentStatus::Pendente {
            return Err(DomainError::validation("a payment can only be processed to aprovado or rejeitado").into());
        }
        if self.status == InvoiceStatus::Cancelada {
            return Err(DomainError::invariant("cannot process payments of a cancelled invoice").into());
        }

        let existing = self
            .find_payment(transacao_id)
            .ok_or_else(|| DomainError::not_found(format!("payment '{transacao_id}'")))?;
        if existing.status != PaymentStatus::Pendente {
            return Err(DomainError::invariant(format!(
                "payment '{transacao_id}' was already processed"
            ))
            .into());
        }

        let payments = self.with_payment_status(transacao_id, novo_status);
        let movimento = if novo_status == PaymentStatus::Aprovado {
            existing.valor
        } else {
            Money::ZERO
        };

        self.reconcile(
            payments,
            PaymentChange::StatusChanged {
                transacao_id: transacao_id.to_string(),
                from: existing.status,
                to: novo_status,
            },
            SettlementSource::Processing,
            movimento,
            None,
            at,
        )
    }

    fn handle_reverse_payment(
        &self,
        transacao_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;

        if self.status == InvoiceStatus::Cancelada {
            return Err(DomainError::invariant("cannot reverse payments of a cancelled invoice").into());
        }

        let existing = self
            .find_payment(transacao_id)
            .ok_or_else(|| DomainError::not_found(format!("payment '{transacao_id}'")))?;
        if !existing.is_approved() {
            return Err(DomainError::invariant("only approved payments can be reversed").into());
        }

        let payments = self.with_payment_status(transacao_id, PaymentStatus::Rejeitado);

        self.reconcile(
            payments,
            PaymentChange::StatusChanged {
                transacao_id: transacao_id.to_string(),
                from: PaymentStatus::Aprovado,
                to: PaymentStatus::Rejeitado,
            },
            SettlementSource::Reversal,
            Money::ZERO - existing.valor,
            Some(format!("estorno-{}", existing.transacao_id)),
            at,
        )
    }

    fn handle_attach_link(
        &self,
        link: &str,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        self.ensure_created()?;
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "cannot attach a payment link to a {} invoice",
                self.status
            ))
            .into());
        }
        if link.trim().is_empty() {
            return Err(DomainError::validation("payment link must not be empty").into());
        }
        Ok(vec![InvoiceEvent::PaymentLinkAttached {
            link: link.to_string(),
            occurred_at: at,
        }])
    }

    fn with_payment_status(&self, transacao_id: &str, status: PaymentStatus) -> Vec<Payment> {
        self.pagamentos
            .iter()
            .cloned()
            .map(|mut p| {
                if p.transacao_id == transacao_id {
                    p.status = status;
                }
                p
            })
            .collect()
    }

    /// Shared recomputation path for every payment-set change.
    fn reconcile(
        &self,
        payments: Vec<Payment>,
        change: PaymentChange,
        origem: SettlementSource,
        valor_movimento: Money,
        correlation_id: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Vec<InvoiceEvent>, LifecycleError> {
        let aggregates =
            recompute_terms(self.valor_total, self.status, self.data_vencimento, &payments, at)?;

        let target = self.settled_status(&aggregates);
        if target != self.status {
            check_transition(self.status, target, TransitionOrigin::Reconciliation)?;
        }

        let aggregates = MonetaryAggregates {
            vencida: is_overdue(target, self.data_vencimento, at),
            ..aggregates
        };

        let settlement = SettlementRecord {
            timestamp: at,
            origem,
            correlation_id,
            status_anterior: self.status,
            status_novo: target,
            valor_total: self.valor_total,
            valor_pago: aggregates.valor_pago,
            valor_movimento,
            quantidade_pagamentos_aprovados: payments.iter().filter(|p| p.is_approved()).count(),
        };

        Ok(vec![InvoiceEvent::PaymentReconciled {
            change,
            aggregates,
            status: target,
            settlement,
            occurred_at: at,
        }])
    }
}
