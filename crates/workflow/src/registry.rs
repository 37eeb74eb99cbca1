use crate::definition::{WorkflowDefinition, WorkflowId};

/// The workflow catalogue with the operator's on/off toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRegistry {
    definitions: Vec<WorkflowDefinition>,
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self {
            definitions: WorkflowDefinition::defaults(),
        }
    }
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with saved toggles applied.
    ///
    /// Only `ativo` is taken from `saved`; workflows missing from it keep
    /// their default, so new workflows show up without losing old toggles.
    pub fn merged(saved: &[WorkflowDefinition]) -> Self {
        let definitions = WorkflowDefinition::defaults()
            .into_iter()
            .map(|mut base| {
                if let Some(existing) = saved.iter().find(|s| s.id == base.id) {
                    base.ativo = existing.ativo;
                }
                base
            })
            .collect();
        Self { definitions }
    }

    pub fn definitions(&self) -> &[WorkflowDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: WorkflowId) -> Option<&WorkflowDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn is_active(&self, id: WorkflowId) -> bool {
        self.get(id).is_some_and(|d| d.ativo)
    }

    pub fn set_active(&mut self, id: WorkflowId, ativo: bool) {
        if let Some(def) = self.definitions.iter_mut().find(|d| d.id == id) {
            def.ativo = ativo;
        }
    }

    /// Flips the toggle; returns the new state.
    pub fn toggle(&mut self, id: WorkflowId) -> bool {
        let next = !self.is_active(id);
        self.set_active(id, next);
        next
    }

    pub fn active(&self) -> impl Iterator<Item = &WorkflowDefinition> {
        self.definitions.iter().filter(|d| d.ativo)
    }
}
