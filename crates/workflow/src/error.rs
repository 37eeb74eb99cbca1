use thiserror::Error;

use crate::definition::WorkflowId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("workflow {0} is disabled")]
    Disabled(WorkflowId),

    #[error("unknown workflow: {0}")]
    Unknown(String),
}
