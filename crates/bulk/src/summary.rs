use billops_remote::{Notice, NoticeKind, RemoteError};

use crate::batch::BatchStep;

/// Aggregated outcome of a batch.
///
/// A batch where every item failed is still a completed batch; the failures
/// are data here, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary<Id> {
    pub succeeded: Vec<Id>,
    pub failed: Vec<(Id, RemoteError)>,
    pub total_processed: usize,
    pub progress_fraction: f64,
}

impl<Id> Default for BatchSummary<Id> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            total_processed: 0,
            progress_fraction: 1.0,
        }
    }
}

impl<Id> BatchSummary<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: BatchStep<Id>) {
        match step.outcome {
            Ok(_) => self.succeeded.push(step.id),
            Err(e) => self.failed.push((step.id, e)),
        }
        self.total_processed += 1;
        self.progress_fraction = step.progress;
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.total_processed > 0 && self.succeeded.is_empty()
    }

    pub fn message(&self) -> String {
        let ok = self.succeeded.len();
        let mut msg = format!("{ok} de {} item(ns) processado(s) com sucesso", self.total_processed);
        if self.has_failures() {
            msg.push_str(&format!(", {} falha(s)", self.failed.len()));
        }
        msg
    }

    /// Toast describing the batch: success, partial failure or total failure.
    pub fn notice(&self, title: impl Into<String>) -> Notice {
        let kind = if self.all_failed() {
            NoticeKind::Error
        } else if self.has_failures() {
            NoticeKind::Warning
        } else {
            NoticeKind::Success
        };
        Notice::new(kind, title, self.message())
    }
}
