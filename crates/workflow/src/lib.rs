//! Billing workflows: due-date reminders, overdue collection and the
//! financial sync that pushes the overdue flag back to the remote API.
//!
//! Eligibility is a pure filter over invoices and "now". Dispatch goes
//! through the remote API one invoice at a time; whether a dispatch was
//! real or simulated is reported by the transport, never guessed.

pub mod definition;
pub mod dispatch;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod history;
pub mod registry;
pub mod result;

pub use definition::{WorkflowDefinition, WorkflowId};
pub use dispatch::{DispatchOutcome, WorkflowDispatcher};
pub use eligibility::{eligible, is_due_soon, needs_collection, needs_overdue_sync};
pub use engine::{WorkflowEngine, WorkflowMetrics};
pub use error::WorkflowError;
pub use history::{ExecutionRecord, ExecutionStatus, WorkflowHistory};
pub use registry::WorkflowRegistry;
pub use result::WorkflowResult;
