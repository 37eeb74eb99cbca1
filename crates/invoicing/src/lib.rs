//! Invoicing domain module: invoice lifecycle, monetary aggregates and
//! payment reconciliation.
//!
//! Deterministic domain logic only (no IO, no HTTP, no storage). "Now" is
//! always an explicit argument.

pub mod aggregates;
pub mod error;
pub mod invoice;
pub mod lifecycle;
pub mod payment;
pub mod reconciliation;
pub mod settlement;

pub use aggregates::{MonetaryAggregates, Overpayment, days_until_due, is_overdue, recompute};
pub use error::LifecycleError;
pub use invoice::{
    CreateInvoice, Invoice, InvoiceCommand, InvoiceEvent, InvoiceRecord, InvoiceStatus,
    InvoiceType, PaymentChange,
};
pub use lifecycle::{TransitionOrigin, cancel, check_transition, mark_sent, request_status};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use reconciliation::{Reconciled, Reconciler};
pub use settlement::{Receivable, ReceivableStatus, SettlementRecord, SettlementSource};
