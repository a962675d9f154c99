use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RawId;
use super::contracts::ContractStatus;

/// One musician booked for one performance slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    #[serde(default)]
    pub musician_id: RawId,
    #[serde(default)]
    pub musician_name: Option<String>,
    #[serde(with = "super::flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub actual_fee: Option<f64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub contract_status: Option<ContractStatus>,
}

impl Assignment {
    /// `actualFee`, else `fee`, else nothing owed.
    pub fn effective_fee(&self) -> f64 {
        self.actual_fee.or(self.fee).unwrap_or(0.0)
    }
}

/// One entry of the `assignments-by-musician` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicianAssignments {
    #[serde(default)]
    pub musician_name: Option<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// `assignments-by-musician` is an object keyed by musician id.
pub type ByMusicianResponse = BTreeMap<String, MusicianAssignments>;
