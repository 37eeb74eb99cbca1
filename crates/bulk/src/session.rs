//! Selection, batch and refresh bound together for one list screen.

use core::fmt::Display;
use core::hash::Hash;
use std::sync::Arc;

use serde_json::Value;

use billops_core::EntityKind;
use billops_remote::{ListFilter, Notice, NoticeKind, NotificationPresenter};
use billops_safeguard::EntitySnapshot;

use crate::actions::BulkAction;
use crate::error::BulkError;
use crate::orchestrator::BulkOrchestrator;
use crate::selection::SelectionSet;
use crate::summary::BatchSummary;

/// A list of one collection with its current selection.
///
/// After a batch settles the session refreshes the list exactly once and
/// clears the selection. A refused batch leaves both untouched. A failed
/// refresh keeps the old rows and marks them stale; the batch summary is
/// still returned.
pub struct BulkSession<Id> {
    orchestrator: BulkOrchestrator,
    kind: EntityKind,
    filter: ListFilter,
    selection: SelectionSet<Id>,
    rows: Vec<Value>,
    stale: bool,
    notifier: Option<Arc<dyn NotificationPresenter>>,
}

impl<Id> BulkSession<Id>
where
    Id: Clone + Eq + Hash + Display + Send + Sync,
{
    pub fn new(orchestrator: BulkOrchestrator, kind: EntityKind) -> Self {
        Self {
            orchestrator,
            kind,
            filter: ListFilter::all(),
            selection: SelectionSet::new(),
            rows: Vec::new(),
            stale: false,
            notifier: None,
        }
    }

    pub fn with_filter(mut self, filter: ListFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationPresenter>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn selection(&self) -> &SelectionSet<Id> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet<Id> {
        &mut self.selection
    }

    /// Rows from the last refresh.
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Whether the last refresh failed and [`Self::rows`] may be outdated.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Reloads the list from the remote API.
    pub async fn refresh(&mut self) -> Result<(), BulkError> {
        match self
            .orchestrator
            .remote()
            .list(self.kind, &self.filter)
            .await
        {
            Ok(rows) => {
                self.rows = rows;
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                self.stale = true;
                Err(e.into())
            }
        }
    }

    /// Runs `action` over the current selection.
    ///
    /// `subjects` are the snapshots the safeguard pre-flight inspects, one per
    /// selected id. The summary is returned even when the follow-up refresh
    /// fails; check [`Self::is_stale`].
    pub async fn run<A>(
        &mut self,
        title: &str,
        action: &A,
        subjects: &[EntitySnapshot],
    ) -> Result<BatchSummary<Id>, BulkError>
    where
        A: BulkAction<Id> + ?Sized,
    {
        let ids = self.selection.ids().to_vec();

        let summary = match self.orchestrator.run_guarded(action, &ids, subjects).await {
            Ok(summary) => summary,
            Err(e) => {
                self.notify(Notice::new(NoticeKind::Error, title, e.to_string()));
                return Err(e);
            }
        };

        self.selection.clear();
        self.notify(summary.notice(title));
        if let Err(e) = self.refresh().await {
            tracing::warn!(kind = %self.kind, error = %e, "list refresh after bulk run failed");
        }
        Ok(summary)
    }

    fn notify(&self, notice: Notice) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(notice);
        }
    }
}
