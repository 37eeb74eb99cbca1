//! Transient, ordered selection of entity ids.

use core::hash::Hash;
use std::collections::HashSet;

use billops_core::Entity;

/// Ids picked by the operator, in the order they were picked.
///
/// Adding an id twice keeps its first position.
#[derive(Debug, Clone)]
pub struct SelectionSet<Id> {
    order: Vec<Id>,
    members: HashSet<Id>,
}

impl<Id> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = Id>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.select(id);
        }
        set
    }

    /// Returns `false` when the id was already selected.
    pub fn select(&mut self, id: Id) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn deselect(&mut self, id: &Id) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|x| x != id);
        true
    }

    /// Flips membership; returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.members.contains(&id) {
            self.deselect(&id);
            false
        } else {
            self.select(id)
        }
    }

    /// Selects every entity of the visible list, keeping earlier picks first.
    pub fn select_all<E>(&mut self, entities: &[E])
    where
        E: Entity<Id = Id>,
    {
        for entity in entities {
            self.select(entity.id().clone());
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.members.contains(id)
    }

    pub fn ids(&self) -> &[Id] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billops_core::SupplierId;
    use billops_parties::{RegisterSupplier, Supplier};

    #[test]
    fn keeps_first_position_and_dedups() {
        let mut set = SelectionSet::from_ids([3, 1, 3, 2]);
        assert_eq!(set.ids(), &[3, 1, 2]);
        assert!(!set.select(1));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("a"));
        assert!(set.toggle("b"));
        assert!(!set.toggle("a"));
        assert_eq!(set.ids(), &["b"]);
        assert!(!set.contains(&"a"));
    }

    #[test]
    fn select_all_appends_unselected_entities() {
        let suppliers: Vec<Supplier> = (1..=3)
            .map(|n| {
                Supplier::register(RegisterSupplier {
                    supplier_id: SupplierId::from_u128(n),
                    nome: format!("Fornecedor {n}"),
                    documento: None,
                    email: None,
                })
                .unwrap()
            })
            .collect();

        let mut set = SelectionSet::from_ids([SupplierId::from_u128(2)]);
        set.select_all(&suppliers);
        assert_eq!(
            set.ids(),
            &[
                SupplierId::from_u128(2),
                SupplierId::from_u128(1),
                SupplierId::from_u128(3)
            ]
        );

        set.clear();
        assert!(set.is_empty());
    }
}
