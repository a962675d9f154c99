use std::collections::BTreeMap;

use serde::Serialize;

use super::{MusicianGroup, is_contract_eligible};

/// Headline numbers for a planner month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerStats {
    pub musicians: usize,
    pub assignments: usize,
    /// Assignments already bound to a contract past `pending`.
    pub contracted: usize,
    pub uncontracted: usize,
    pub total_fee: f64,
}

impl PlannerStats {
    pub fn from_groups(groups: &BTreeMap<i64, MusicianGroup>) -> Self {
        groups.values().fold(Self::default(), |mut stats, group| {
            let locked = group
                .assignments
                .iter()
                .filter(|a| !is_contract_eligible(a))
                .count();
            stats.musicians += 1;
            stats.assignments += group.assignments.len();
            stats.contracted += locked;
            stats.uncontracted += group.assignments.len() - locked;
            stats.total_fee += group.total_fee;
            stats
        })
    }
}
