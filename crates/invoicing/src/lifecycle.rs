//! Invoice state machine.
//!
//! Two kinds of writers move an invoice: the user (send, cancel) and payment
//! reconciliation (paid, partially paid, back to unpaid after a reversal).
//! Only reconciliation may set a money-derived status.

use chrono::{DateTime, Utc};

use billops_core::execute;

use crate::error::LifecycleError;
use crate::invoice::{Invoice, InvoiceCommand, InvoiceStatus};

/// Who is asking for the status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionOrigin {
    User,
    Reconciliation,
}

/// Validate a single status move.
pub fn check_transition(
    from: InvoiceStatus,
    to: InvoiceStatus,
    origin: TransitionOrigin,
) -> Result<(), LifecycleError> {
    use InvoiceStatus::*;
    use TransitionOrigin::*;

    let legal = match (from, to, origin) {
        _ if from == to => false,
        // Overdue is a derived view, never a write target.
        (_, Vencida, _) => false,
        // A reversal may reopen a paid invoice.
        (Paga, Pendente | Enviada | ParcialmentePaga, Reconciliation) => true,
        (Paga | Cancelada, _, _) => false,
        (_, Cancelada, _) => true,
        (_, Paga | ParcialmentePaga, Reconciliation) => true,
        (Pendente | Vencida, Enviada, User) => true,
        (ParcialmentePaga, Enviada | Pendente, Reconciliation) => true,
        _ => false,
    };

    if legal {
        Ok(())
    } else {
        Err(LifecycleError::invalid_transition(from, to))
    }
}

/// Cancel an invoice. Fails on `PAGA` and `CANCELADA`.
pub fn cancel(
    invoice: &Invoice,
    motivo: Option<String>,
    now: DateTime<Utc>,
) -> Result<Invoice, LifecycleError> {
    let mut next = invoice.clone();
    execute(
        &mut next,
        &InvoiceCommand::Cancel {
            motivo,
            occurred_at: now,
        },
    )?;
    tracing::info!(invoice_id = %next.invoice_id(), from = %invoice.status(), "invoice cancelled");
    Ok(next)
}

/// Record that the invoice was dispatched to the client.
pub fn mark_sent(invoice: &Invoice, now: DateTime<Utc>) -> Result<Invoice, LifecycleError> {
    let mut next = invoice.clone();
    execute(&mut next, &InvoiceCommand::MarkSent { occurred_at: now })?;
    Ok(next)
}

/// A user asking for an arbitrary target status.
///
/// Money-derived statuses (`PAGA`, `PARCIALMENTE_PAGA`) are always refused
/// here; they are reachable through reconciliation only.
pub fn request_status(
    invoice: &Invoice,
    target: InvoiceStatus,
    now: DateTime<Utc>,
) -> Result<Invoice, LifecycleError> {
    check_transition(invoice.status(), target, TransitionOrigin::User)?;

    match target {
        InvoiceStatus::Enviada => mark_sent(invoice, now),
        InvoiceStatus::Cancelada => cancel(invoice, None, now),
        other => Err(LifecycleError::invalid_transition(invoice.status(), other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{CreateInvoice, InvoiceType};
    use billops_core::{InvoiceId, Money};
    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    fn pending_invoice() -> Invoice {
        Invoice::create(CreateInvoice {
            invoice_id: InvoiceId::from_u128(42),
            numero: "FT-42".to_string(),
            valor_total: Money::from_units(500),
            data_emissao: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            tipo: InvoiceType::Parcela,
            cliente: None,
            occurred_at: now(),
        })
        .unwrap()
    }

    fn status_strategy() -> impl Strategy<Value = InvoiceStatus> {
        prop::sample::select(InvoiceStatus::ALL.to_vec())
    }

    #[test]
    fn user_cannot_mark_paid() {
        let invoice = pending_invoice();
        let err = request_status(&invoice, InvoiceStatus::Paga, now()).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::invalid_transition(InvoiceStatus::Pendente, InvoiceStatus::Paga)
        );
    }

    #[test]
    fn send_then_cancel() {
        let sent = request_status(&pending_invoice(), InvoiceStatus::Enviada, now()).unwrap();
        assert_eq!(sent.status(), InvoiceStatus::Enviada);
        assert_eq!(sent.data_envio(), Some(now()));

        let cancelled = cancel(&sent, Some("duplicada".into()), now()).unwrap();
        assert_eq!(cancelled.status(), InvoiceStatus::Cancelada);
        assert_eq!(sent.status(), InvoiceStatus::Enviada);
    }

    #[test]
    fn cancelling_twice_is_rejected() {
        let cancelled = cancel(&pending_invoice(), None, now()).unwrap();
        let err = cancel(&cancelled, None, now()).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn reconciliation_may_reopen_paid_invoice() {
        assert!(
            check_transition(
                InvoiceStatus::Paga,
                InvoiceStatus::ParcialmentePaga,
                TransitionOrigin::Reconciliation
            )
            .is_ok()
        );
        assert!(
            check_transition(InvoiceStatus::Paga, InvoiceStatus::Enviada, TransitionOrigin::User)
                .is_err()
        );
    }

    #[test]
    fn stored_overdue_invoice_can_still_be_sent() {
        assert!(
            check_transition(InvoiceStatus::Vencida, InvoiceStatus::Enviada, TransitionOrigin::User)
                .is_ok()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn user_never_reaches_money_statuses(from in status_strategy()) {
            prop_assert!(check_transition(from, InvoiceStatus::Paga, TransitionOrigin::User).is_err());
            prop_assert!(check_transition(from, InvoiceStatus::ParcialmentePaga, TransitionOrigin::User).is_err());
        }

        #[test]
        fn cancelled_is_a_dead_end(to in status_strategy(), reconciliation in any::<bool>()) {
            let origin = if reconciliation { TransitionOrigin::Reconciliation } else { TransitionOrigin::User };
            prop_assert!(check_transition(InvoiceStatus::Cancelada, to, origin).is_err());
        }

        #[test]
        fn overdue_is_never_a_target(from in status_strategy(), reconciliation in any::<bool>()) {
            let origin = if reconciliation { TransitionOrigin::Reconciliation } else { TransitionOrigin::User };
            prop_assert!(check_transition(from, InvoiceStatus::Vencida, origin).is_err());
        }
    }
}
