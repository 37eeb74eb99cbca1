//! Sequential batch driver with safeguard pre-flight.

use core::fmt::Display;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};

use billops_core::EntityKind;
use billops_remote::{ExportColumn, ExportFormat, ExportRenderer, RemoteApi};
use billops_safeguard::{
    ConfirmationPresenter, ConfirmationRequest, Decision, EntitySnapshot, RequestedAction,
    resolve_batch,
};

use crate::actions::{BulkAction, FetchForExport};
use crate::batch::BatchRun;
use crate::error::BulkError;
use crate::summary::BatchSummary;

/// What happened to a single guarded mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOutcome {
    Executed,
    Dismissed,
}

/// Rendered export plus the per-item fetch outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput<Id> {
    pub document: Vec<u8>,
    pub summary: BatchSummary<Id>,
}

#[derive(Clone)]
pub struct BulkOrchestrator {
    remote: Arc<dyn RemoteApi>,
}

impl BulkOrchestrator {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &dyn RemoteApi {
        self.remote.as_ref()
    }

    /// Starts a batch to be driven step by step.
    ///
    /// Actions that need a safeguard check are refused here; use
    /// [`Self::start_guarded`] for those.
    pub fn start<'a, Id, A>(
        &'a self,
        action: &'a A,
        ids: &'a [Id],
    ) -> Result<BatchRun<'a, Id, A>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        if action.guarded_as().is_some() {
            tracing::warn!(
                action = action.name(),
                total = ids.len(),
                "bulk run without pre-flight refused"
            );
            return Err(BulkError::PreflightRequired {
                action: action.name(),
            });
        }
        Ok(BatchRun::new(self.remote.as_ref(), action, ids))
    }

    /// Starts a batch after the safeguard pre-flight over `subjects`.
    ///
    /// `subjects` must hold exactly one snapshot per selected id, of the
    /// action's collection. A block or a mismatch returns before any remote
    /// call.
    pub fn start_guarded<'a, Id, A>(
        &'a self,
        action: &'a A,
        ids: &'a [Id],
        subjects: &[EntitySnapshot],
    ) -> Result<BatchRun<'a, Id, A>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        preflight(action, ids, subjects)?;
        Ok(BatchRun::new(self.remote.as_ref(), action, ids))
    }

    pub async fn run<Id, A>(&self, action: &A, ids: &[Id]) -> Result<BatchSummary<Id>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        self.run_with_progress(action, ids, |_| {}).await
    }

    /// Like [`Self::run`], reporting the progress fraction after every item.
    pub async fn run_with_progress<Id, A>(
        &self,
        action: &A,
        ids: &[Id],
        on_progress: impl FnMut(f64) + Send,
    ) -> Result<BatchSummary<Id>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        let run = self.start(action, ids)?;
        Ok(drive(run, action, on_progress).await)
    }

    /// Runs the batch only if the aggregated safeguard decision over
    /// `subjects` (one snapshot per selected id) is not a block.
    pub async fn run_guarded<Id, A>(
        &self,
        action: &A,
        ids: &[Id],
        subjects: &[EntitySnapshot],
    ) -> Result<BatchSummary<Id>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        self.run_guarded_with_progress(action, ids, subjects, |_| {})
            .await
    }

    pub async fn run_guarded_with_progress<Id, A>(
        &self,
        action: &A,
        ids: &[Id],
        subjects: &[EntitySnapshot],
        on_progress: impl FnMut(f64) + Send,
    ) -> Result<BatchSummary<Id>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
        A: BulkAction<Id> + ?Sized,
    {
        let run = self.start_guarded(action, ids, subjects)?;
        Ok(drive(run, action, on_progress).await)
    }

    /// Fetches every selected record, then renders the readable ones once.
    pub async fn export<Id>(
        &self,
        kind: EntityKind,
        ids: &[Id],
        columns: &[ExportColumn],
        format: ExportFormat,
        renderer: &dyn ExportRenderer,
    ) -> Result<ExportOutput<Id>, BulkError>
    where
        Id: Clone + Display + Send + Sync,
    {
        let fetch = FetchForExport::new(kind);
        let mut run = self.start(&fetch, ids)?;
        let mut summary = BatchSummary::new();
        let mut rows = Vec::with_capacity(ids.len());

        while let Some(step) = run.step().await {
            if let Ok(row) = &step.outcome {
                rows.push(row.clone());
            }
            summary.record(step);
        }

        let document = renderer.render(&rows, columns, format)?;
        tracing::info!(%kind, rows = rows.len(), format = ?format, "export rendered");
        Ok(ExportOutput { document, summary })
    }

    /// Deletes one entity after the operator confirms.
    pub async fn guarded_delete(
        &self,
        subject: EntitySnapshot,
        presenter: &dyn ConfirmationPresenter,
    ) -> Result<GuardedOutcome, BulkError> {
        let request = ConfirmationRequest::single(subject, RequestedAction::Delete);
        if !self.confirm(&request, presenter).await? {
            return Ok(GuardedOutcome::Dismissed);
        }

        let subject = &request.subjects[0];
        self.remote
            .delete(subject.kind(), &subject.remote_id())
            .await?;
        tracing::info!(kind = %subject.kind(), id = %subject.remote_id(), "deleted");
        Ok(GuardedOutcome::Executed)
    }

    /// Cancels one entity after the operator confirms.
    pub async fn guarded_cancel(
        &self,
        subject: EntitySnapshot,
        motivo: Option<String>,
        presenter: &dyn ConfirmationPresenter,
    ) -> Result<GuardedOutcome, BulkError> {
        let request = ConfirmationRequest::single(subject, RequestedAction::Cancel);
        if !self.confirm(&request, presenter).await? {
            return Ok(GuardedOutcome::Dismissed);
        }

        let subject = &request.subjects[0];
        let mut patch = Map::new();
        patch.insert("status".into(), Value::from(cancelled_status(subject.kind())));
        if let Some(motivo) = motivo {
            patch.insert("motivo".into(), Value::from(motivo));
        }
        self.remote
            .update(subject.kind(), &subject.remote_id(), Value::Object(patch))
            .await?;
        tracing::info!(kind = %subject.kind(), id = %subject.remote_id(), "cancelled");
        Ok(GuardedOutcome::Executed)
    }

    /// Prompts when the resolution names a template; a block is shown for
    /// acknowledgement and then refused.
    async fn confirm(
        &self,
        request: &ConfirmationRequest,
        presenter: &dyn ConfirmationPresenter,
    ) -> Result<bool, BulkError> {
        let decision = if request.requires_prompt() {
            presenter.decide(request).await
        } else {
            Decision::Confirm
        };
        Ok(request.proceed(decision)?)
    }
}

async fn drive<Id, A>(
    run: BatchRun<'_, Id, A>,
    action: &A,
    on_progress: impl FnMut(f64) + Send,
) -> BatchSummary<Id>
where
    Id: Clone + Display + Send + Sync,
    A: BulkAction<Id> + ?Sized,
{
    tracing::info!(action = action.name(), total = run.total(), "bulk run started");
    let summary = run.finish(on_progress).await;
    tracing::info!(
        action = action.name(),
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "bulk run finished"
    );
    summary
}

/// Pairs every selected id with exactly one snapshot of the action's
/// collection, then resolves the batch. Unguarded actions pass through.
fn preflight<Id, A>(action: &A, ids: &[Id], subjects: &[EntitySnapshot]) -> Result<(), BulkError>
where
    Id: Display + Sync,
    A: BulkAction<Id> + ?Sized,
{
    let Some(requested) = action.guarded_as() else {
        return Ok(());
    };

    let selected: HashSet<String> = ids.iter().map(ToString::to_string).collect();
    let mut covered: HashMap<String, usize> = HashMap::with_capacity(subjects.len());
    for subject in subjects {
        let id = subject.remote_id();
        if subject.kind() != action.collection() || !selected.contains(&id) {
            return Err(mismatch(action.name(), id));
        }
        *covered.entry(id).or_default() += 1;
    }
    if let Some(id) = selected.into_iter().find(|id| covered.get(id) != Some(&1)) {
        return Err(mismatch(action.name(), id));
    }

    let resolution = resolve_batch(subjects, requested);
    if let Some(blocked) = resolution.blocked() {
        tracing::warn!(
            action = action.name(),
            total = ids.len(),
            reason = %blocked.reason,
            "bulk run refused"
        );
        return Err(blocked.into());
    }
    Ok(())
}

fn mismatch(action: &'static str, id: String) -> BulkError {
    tracing::warn!(action, item = %id, "pre-flight snapshots do not match the selection");
    BulkError::SnapshotMismatch { id }
}

fn cancelled_status(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Invoice => "cancelada",
        _ => "cancelado",
    }
}
