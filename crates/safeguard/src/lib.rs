//! Safeguard resolution: which confirmation (if any) an operator must see
//! before a destructive or irreversible action, and which actions are
//! refused outright.
//!
//! Resolution is a pure function of an entity snapshot and the requested
//! action. Anything time-dependent (the overdue view) is captured into the
//! snapshot by the caller.

pub mod kind;
pub mod request;
pub mod resolver;
pub mod rules;
pub mod snapshot;
pub mod variant;

pub use kind::{ConfirmationKind, Severity};
pub use request::{ConfirmationPresenter, ConfirmationRequest, Decision, ScriptedPresenter};
pub use resolver::{BatchResolution, DisplayContext, Resolution, resolve, resolve_batch};
pub use snapshot::{
    ContractSnapshot, EntitySnapshot, InvoiceSnapshot, PayableSnapshot, PaymentSnapshot,
    RequestedAction, SupplierSnapshot, capture,
};
pub use variant::{ConfirmationVariant, SafeguardBlocked, SuggestedAction};
