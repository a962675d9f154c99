use std::collections::HashSet;

use super::{MusicianGroup, is_contract_eligible};

/// Assignment checkboxes ticked in the contract view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, assignment_id: i64) -> bool {
        self.selected.contains(&assignment_id)
    }

    pub fn toggle(&mut self, assignment_id: i64) {
        if !self.selected.remove(&assignment_id) {
            self.selected.insert(assignment_id);
        }
    }

    /// The "select all" checkbox of one musician. Locked assignments are
    /// never touched.
    pub fn set_all(&mut self, group: &MusicianGroup, selected: bool) {
        for assignment in group.eligible() {
            if selected {
                self.selected.insert(assignment.id);
            } else {
                self.selected.remove(&assignment.id);
            }
        }
    }

    /// Checked iff the group has something to contract and every such
    /// assignment is selected.
    pub fn all_selected(&self, group: &MusicianGroup) -> bool {
        let mut eligible = group.eligible().peekable();
        eligible.peek().is_some() && eligible.all(|a| self.selected.contains(&a.id))
    }

    /// Selected ids that may go into a new contract, in date order.
    pub fn selected_eligible(&self, group: &MusicianGroup) -> Vec<i64> {
        group
            .eligible()
            .filter(|a| self.selected.contains(&a.id))
            .map(|a| a.id)
            .collect()
    }

    /// Selected ids in `group` that are already locked into a non-pending contract.
    pub fn selected_locked(&self, group: &MusicianGroup) -> Vec<i64> {
        group
            .assignments
            .iter()
            .filter(|a| !is_contract_eligible(a) && self.selected.contains(&a.id))
            .map(|a| a.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<i64> for Selection {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::group_by_musician;
    use crate::aggregation::tests::{assignment, contracted};
    use crate::models::contracts::ContractStatus;

    fn mixed_group() -> MusicianGroup {
        let assignments = vec![
            assignment(1, 5, 100.0, "2024-06-01"),
            contracted(assignment(2, 5, 100.0, "2024-06-02"), 30, ContractStatus::Pending),
            contracted(assignment(3, 5, 100.0, "2024-06-03"), 31, ContractStatus::Sent),
            contracted(assignment(4, 5, 100.0, "2024-06-04"), 32, ContractStatus::Accepted),
        ];
        group_by_musician(&assignments).remove(&5).unwrap()
    }

    #[test]
    fn all_selected_ignores_locked_assignments() {
        let group = mixed_group();
        let selection: Selection = [1, 2].into_iter().collect();
        assert!(selection.all_selected(&group));
    }

    #[test]
    fn all_selected_is_false_when_an_eligible_one_is_missing() {
        let group = mixed_group();
        let selection: Selection = [1, 3, 4].into_iter().collect();
        assert!(!selection.all_selected(&group));
    }

    #[test]
    fn fully_locked_group_is_never_all_selected() {
        let assignments = vec![contracted(
            assignment(9, 6, 10.0, "2024-06-01"),
            50,
            ContractStatus::Sent,
        )];
        let group = group_by_musician(&assignments).remove(&6).unwrap();
        let selection: Selection = [9].into_iter().collect();
        assert!(!selection.all_selected(&group));
    }

    #[test]
    fn set_all_only_touches_eligible() {
        let group = mixed_group();
        let mut selection = Selection::new();

        selection.set_all(&group, true);
        assert_eq!(selection.selected_eligible(&group), vec![1, 2]);
        assert!(!selection.is_selected(3));
        assert!(selection.all_selected(&group));

        selection.toggle(2);
        assert!(!selection.all_selected(&group));

        selection.set_all(&group, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn reports_locked_selections() {
        let group = mixed_group();
        let selection: Selection = [1, 3].into_iter().collect();
        assert_eq!(selection.selected_locked(&group), vec![3]);
        assert_eq!(selection.selected_eligible(&group), vec![1]);
    }
}
