use serde::Serialize;

use crate::models::contract_dates::{ContractDate, DateStatus};
use crate::models::contracts::{ContractMusician, ContractStatus};

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        0
    } else {
        (part * 100 / whole) as u8
    }
}

/// Per-date answer counts for one musician's contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub cancelled: usize,
    /// Fee over dates that are neither rejected nor cancelled.
    pub total_fee: f64,
    pub completion_percent: u8,
    pub fully_responded: bool,
}

impl ResponseSummary {
    pub fn from_dates(dates: &[ContractDate]) -> Self {
        let mut summary = dates.iter().fold(Self::default(), |mut s, date| {
            s.total += 1;
            match date.status {
                DateStatus::Pending => s.pending += 1,
                DateStatus::Accepted => s.accepted += 1,
                DateStatus::Rejected => s.rejected += 1,
                DateStatus::Cancelled => s.cancelled += 1,
            }
            if !matches!(date.status, DateStatus::Rejected | DateStatus::Cancelled) {
                s.total_fee += date.fee.unwrap_or(0.0);
            }
            s
        });

        summary.completion_percent = percent(summary.total - summary.pending, summary.total);
        summary.fully_responded = summary.pending == 0;
        summary
    }

    /// No date is still waiting for an answer.
    pub fn is_fully_responded(&self) -> bool {
        self.fully_responded
    }
}

/// How far a monthly contract has got across its musicians.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractProgress {
    pub musicians: usize,
    /// Not dispatched yet (draft, pending, needs revision, unknown).
    pub awaiting_dispatch: usize,
    pub sent: usize,
    /// Includes the legacy `signed`, which ingests as accepted.
    pub accepted: usize,
    pub rejected: usize,
    pub cancelled: usize,
    /// Accepted musicians over musicians whose contract is not cancelled.
    pub completion_percent: u8,
}

impl ContractProgress {
    pub fn from_musicians(musicians: &[ContractMusician]) -> Self {
        let mut progress = musicians.iter().fold(Self::default(), |mut p, musician| {
            p.musicians += 1;
            match musician.status {
                ContractStatus::Sent => p.sent += 1,
                ContractStatus::Accepted => p.accepted += 1,
                ContractStatus::Rejected => p.rejected += 1,
                ContractStatus::Cancelled => p.cancelled += 1,
                ContractStatus::Draft
                | ContractStatus::Pending
                | ContractStatus::NeedsRevision
                | ContractStatus::Unknown(_) => p.awaiting_dispatch += 1,
            }
            p
        });

        progress.completion_percent = percent(progress.accepted, progress.musicians - progress.cancelled);
        progress
    }
}
