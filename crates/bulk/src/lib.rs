//! Bulk operations over a selection of entities.
//!
//! Items run one after another in selection order. A failing item is
//! recorded and the batch moves on; the caller refreshes once when the
//! batch has settled.

pub mod actions;
pub mod batch;
pub mod error;
pub mod orchestrator;
pub mod selection;
pub mod session;
pub mod summary;

pub use actions::{
    BulkAction, DeleteEntities, FetchForExport, MarkPayablesPaid, SendInvoiceEmails,
    SetSupplierActive,
};
pub use batch::{BatchRun, BatchStep};
pub use error::BulkError;
pub use orchestrator::{BulkOrchestrator, ExportOutput, GuardedOutcome};
pub use selection::SelectionSet;
pub use session::BulkSession;
pub use summary::BatchSummary;
