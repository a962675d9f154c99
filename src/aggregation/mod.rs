//! Grouping of planner assignments by musician and by contract.
//!
//! Everything here is recomputed from the fetched payload on every read;
//! nothing is persisted.

pub mod selection;
pub mod stats;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::models::assignments::{Assignment, ByMusicianResponse};
use crate::models::contracts::ContractStatus;
use crate::models::{PLACEHOLDER_MUSICIAN_ID, RawId};

pub use selection::Selection;
pub use stats::PlannerStats;

/// All assignments of one musician, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicianGroup {
    pub musician_id: i64,
    pub musician_name: Option<String>,
    pub assignments: Vec<Assignment>,
    pub total_fee: f64,
}

/// Which contract a bucket of assignments belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "contractId")]
pub enum ContractBucketKey {
    Contract(i64),
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractBucket<'a> {
    pub key: ContractBucketKey,
    pub status: Option<ContractStatus>,
    pub assignments: Vec<&'a Assignment>,
}

impl MusicianGroup {
    fn new(musician_id: i64, musician_name: Option<String>, mut assignments: Vec<Assignment>) -> Self {
        assignments.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        let total_fee = assignments.iter().map(Assignment::effective_fee).sum();
        let musician_name = musician_name.or_else(|| {
            assignments
                .iter()
                .find_map(|a| a.musician_name.clone())
        });

        Self {
            musician_id,
            musician_name,
            assignments,
            total_fee,
        }
    }

    /// Secondary grouping by contract, in the order each contract first
    /// appears in the date-sorted list.
    pub fn by_contract(&self) -> Vec<ContractBucket<'_>> {
        let mut buckets: Vec<ContractBucket<'_>> = Vec::new();
        for assignment in &self.assignments {
            let key = match assignment.contract_id {
                Some(id) => ContractBucketKey::Contract(id),
                None => ContractBucketKey::Unassigned,
            };
            match buckets.iter_mut().find(|b| b.key == key) {
                Some(bucket) => {
                    if bucket.status.is_none() {
                        bucket.status = assignment.contract_status.clone();
                    }
                    bucket.assignments.push(assignment);
                }
                None => buckets.push(ContractBucket {
                    key,
                    status: assignment.contract_status.clone(),
                    assignments: vec![assignment],
                }),
            }
        }
        buckets
    }

    pub fn assignment_ids(&self) -> Vec<i64> {
        self.assignments.iter().map(|a| a.id).collect()
    }

    /// Assignments that can still go into a new contract, in date order.
    pub fn eligible(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| is_contract_eligible(a))
    }
}

/// An assignment may be (re)contracted while it has no contract, or its
/// contract is still exactly `pending`.
pub fn is_contract_eligible(assignment: &Assignment) -> bool {
    match assignment.contract_id {
        None => true,
        Some(_) => assignment.contract_status == Some(ContractStatus::Pending),
    }
}

/// `None` for the placeholder musician and for ids that are not numeric.
fn groupable_id(raw: &RawId) -> Option<i64> {
    match raw.parse() {
        Some(PLACEHOLDER_MUSICIAN_ID) => None,
        Some(id) => Some(id),
        None => {
            debug!("Skipping assignment with malformed musician id `{}`", raw.as_str());
            None
        }
    }
}

/// Group a flat assignment list by musician id.
pub fn group_by_musician(assignments: &[Assignment]) -> BTreeMap<i64, MusicianGroup> {
    let mut buckets: BTreeMap<i64, Vec<Assignment>> = BTreeMap::new();
    for assignment in assignments {
        if let Some(id) = groupable_id(&assignment.musician_id) {
            buckets.entry(id).or_default().push(assignment.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(id, assignments)| (id, MusicianGroup::new(id, None, assignments)))
        .collect()
}

/// Group the keyed `assignments-by-musician` payload.
///
/// The object key is authoritative for the musician id. Keys that spell the
/// same id differently (`"5"`, `"05"`) land in one group.
pub fn group_fetched(response: ByMusicianResponse) -> BTreeMap<i64, MusicianGroup> {
    let mut merged: BTreeMap<i64, (Option<String>, Vec<Assignment>)> = BTreeMap::new();
    for (key, entry) in response {
        let Some(id) = groupable_id(&RawId::new(key)) else {
            continue;
        };
        let (name, assignments) = merged.entry(id).or_default();
        if name.is_none() {
            *name = entry.musician_name;
        }
        assignments.extend(entry.assignments);
    }

    merged
        .into_iter()
        .map(|(id, (name, assignments))| (id, MusicianGroup::new(id, name, assignments)))
        .collect()
}
