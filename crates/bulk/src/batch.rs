//! Step-wise execution of one action over a list of ids.

use core::fmt::Display;

use serde_json::Value;

use billops_remote::{RemoteApi, RemoteError};

use crate::actions::BulkAction;
use crate::summary::BatchSummary;

/// Result of one item plus the batch progress right after it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStep<Id> {
    pub id: Id,
    pub outcome: Result<Value, RemoteError>,
    pub progress: f64,
}

/// A batch in flight. Each [`BatchRun::step`] processes exactly one item.
///
/// There is no mid-batch cancellation: dropping the run leaves the remaining
/// items untouched, which callers must not rely on.
pub struct BatchRun<'a, Id, A: ?Sized> {
    remote: &'a dyn RemoteApi,
    action: &'a A,
    ids: &'a [Id],
    next: usize,
}

impl<'a, Id, A> BatchRun<'a, Id, A>
where
    Id: Clone + Display + Send + Sync,
    A: BulkAction<Id> + ?Sized,
{
    pub fn new(remote: &'a dyn RemoteApi, action: &'a A, ids: &'a [Id]) -> Self {
        Self {
            remote,
            action,
            ids,
            next: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.ids.len()
    }

    pub fn completed(&self) -> usize {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.ids.len()
    }

    /// `completed / total`; an empty batch has nothing left and reports 1.0.
    pub fn progress(&self) -> f64 {
        if self.ids.is_empty() {
            1.0
        } else {
            self.next as f64 / self.ids.len() as f64
        }
    }

    /// Runs the next item; `None` once every item has been processed.
    pub async fn step(&mut self) -> Option<BatchStep<Id>> {
        let id = self.ids.get(self.next)?.clone();
        let outcome = self.action.apply(self.remote, &id).await;
        self.next += 1;

        match &outcome {
            Ok(_) => tracing::debug!(
                action = self.action.name(),
                item = %id,
                completed = self.next,
                total = self.ids.len(),
                "bulk item done"
            ),
            Err(e) => tracing::warn!(
                action = self.action.name(),
                item = %id,
                error = %e,
                "bulk item failed"
            ),
        }

        Some(BatchStep {
            id,
            outcome,
            progress: self.progress(),
        })
    }

    /// Drains the remaining items into a summary.
    pub async fn finish(mut self, mut on_progress: impl FnMut(f64) + Send) -> BatchSummary<Id> {
        let mut summary = BatchSummary::new();
        while let Some(step) = self.step().await {
            on_progress(step.progress);
            summary.record(step);
        }
        summary.progress_fraction = self.progress();
        summary
    }
}
