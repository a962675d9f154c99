use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Response status of one date inside a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl DateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse_lossy(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" | "signed" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Musicians answer pending dates once; staff may cancel anything.
    pub fn can_transition_to(&self, next: DateStatus) -> bool {
        match (self, next) {
            (_, Self::Cancelled) => true,
            (Self::Pending, Self::Accepted | Self::Rejected) => true,
            _ => false,
        }
    }

    pub fn is_responded(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl From<String> for DateStatus {
    fn from(raw: String) -> Self {
        Self::parse_lossy(&raw).unwrap_or_else(|| {
            tracing::warn!("Unrecognized contract date status `{raw}`, treating as pending");
            Self::Pending
        })
    }
}

impl From<DateStatus> for String {
    fn from(status: DateStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One date line inside a musician's monthly contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDate {
    pub id: i64,
    #[serde(alias = "monthlyContractMusicianId", alias = "contractMusicianId")]
    pub contract_id: i64,
    #[serde(with = "super::flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub fee: Option<f64>,
    pub status: DateStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub musician_signature: Option<String>,
    #[serde(default)]
    pub venue_name: Option<String>,
}

/// Request body for `PUT monthly-contract-dates/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDateStatus {
    pub status: DateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub musician_signature: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_dates_take_a_response() {
        use DateStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Accepted));
    }

    #[test]
    fn staff_can_cancel_from_any_state() {
        for status in [DateStatus::Pending, DateStatus::Accepted, DateStatus::Rejected] {
            assert!(status.can_transition_to(DateStatus::Cancelled));
        }
    }

    #[test]
    fn parse_lossy_folds_legacy_spellings() {
        assert_eq!(DateStatus::parse_lossy(" Signed "), Some(DateStatus::Accepted));
        assert_eq!(DateStatus::parse_lossy("canceled"), Some(DateStatus::Cancelled));
        assert_eq!(DateStatus::parse_lossy("maybe"), None);
    }

    #[test]
    fn unknown_date_status_counts_as_pending() {
        let date: ContractDate = serde_json::from_str(
            r#"{"id": 3, "contractId": 9, "date": "2024-06-01", "status": "maybe"}"#,
        )
        .unwrap();
        assert_eq!(date.status, DateStatus::Pending);
        assert!(!date.status.is_responded());
    }

    #[test]
    fn update_body_skips_absent_fields() {
        let body = UpdateDateStatus {
            status: DateStatus::Rejected,
            notes: Some("double booked".to_string()),
            ip_address: None,
            musician_signature: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "rejected", "notes": "double booked"})
        );
    }
}
