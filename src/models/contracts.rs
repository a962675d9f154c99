use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResponseToken;
use super::contract_dates::ContractDate;

/// Contract status, normalized at ingestion.
///
/// `signed` is a legacy synonym of `accepted` and never survives parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractStatus {
    Draft,
    Pending,
    Sent,
    Accepted,
    Rejected,
    Cancelled,
    NeedsRevision,
    /// A value this client does not know; kept for display only.
    Unknown(String),
}

impl ContractStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::NeedsRevision => "needs-revision",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn from_str_lossy(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "sent" => Self::Sent,
            "accepted" | "signed" => Self::Accepted,
            "rejected" => Self::Rejected,
            "cancelled" | "canceled" => Self::Cancelled,
            "needs-revision" | "needsrevision" => Self::NeedsRevision,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Cancelled)
    }

    /// Whether staff may still move this contract to `next` from the client.
    pub fn can_transition_to(&self, next: &ContractStatus) -> bool {
        use ContractStatus::*;
        match (self, next) {
            (Draft | Pending | NeedsRevision, Sent) => true,
            (Draft | Pending | NeedsRevision, Cancelled) => true,
            (Sent, Sent | Accepted | Rejected | Cancelled) => true,
            _ => false,
        }
    }
}

impl From<String> for ContractStatus {
    fn from(raw: String) -> Self {
        let status = Self::from_str_lossy(&raw);
        if let Self::Unknown(value) = &status {
            tracing::warn!("Unrecognized contract status `{value}`");
        }
        status
    }
}

impl From<ContractStatus> for String {
    fn from(status: ContractStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated document bundling one month of assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyContract {
    pub id: i64,
    #[serde(alias = "monthlyPlannerId")]
    pub planner_id: i64,
    #[serde(default)]
    pub musician_id: Option<i64>,
    pub month: u32,
    pub year: i32,
    pub status: ContractStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token: Option<ResponseToken>,
}

/// The part of a monthly contract addressed to one musician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMusician {
    pub id: i64,
    #[serde(alias = "contractId")]
    pub monthly_contract_id: i64,
    pub musician_id: i64,
    #[serde(default)]
    pub musician_name: Option<String>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    pub status: ContractStatus,
    #[serde(default)]
    pub token: Option<ResponseToken>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "contractDates")]
    pub dates: Vec<ContractDate>,
}

// ── Generation ──

/// Scope of a generate call: one musician's selected assignments, or the
/// whole planner month when `musician_id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub planner_id: i64,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub musician_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_ids: Option<Vec<i64>>,
}

/// Canonical handle to a contract the backend created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractRef {
    pub id: i64,
}

/// The generate endpoint has answered with `id` or with `contractId`
/// depending on the backend revision.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Id {
        id: i64,
    },
    ContractId {
        #[serde(rename = "contractId")]
        contract_id: i64,
    },
    Unrecognized(serde_json::Value),
}

impl GenerateResponse {
    /// `None` unless the backend named a positive id.
    pub fn contract_ref(&self) -> Option<ContractRef> {
        let id = match self {
            Self::Id { id } => *id,
            Self::ContractId { contract_id } => *contract_id,
            Self::Unrecognized(_) => return None,
        };
        (id > 0).then_some(ContractRef { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_normalizes_to_accepted() {
        let signed: ContractStatus = serde_json::from_str("\"signed\"").unwrap();
        let accepted: ContractStatus = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(signed, ContractStatus::Accepted);
        assert_eq!(signed, accepted);
        assert_eq!(serde_json::to_string(&signed).unwrap(), "\"accepted\"");
    }

    #[test]
    fn revision_spellings_normalize() {
        for raw in ["needs-revision", "needs_revision", "needsRevision", "Needs Revision"] {
            assert_eq!(
                ContractStatus::from_str_lossy(raw),
                ContractStatus::NeedsRevision,
                "{raw}"
            );
        }
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status: ContractStatus = serde_json::from_str("\"on-hold\"").unwrap();
        assert_eq!(status, ContractStatus::Unknown("on-hold".to_string()));
        assert_eq!(status.to_string(), "on-hold");
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        use ContractStatus::*;
        assert!(Draft.can_transition_to(&Sent));
        assert!(Pending.can_transition_to(&Sent));
        assert!(Sent.can_transition_to(&Accepted));
        assert!(Sent.can_transition_to(&Rejected));
        assert!(Sent.can_transition_to(&Cancelled));
        assert!(Sent.can_transition_to(&Sent));

        for terminal in [Accepted, Rejected, Cancelled] {
            for next in [Draft, Pending, Sent, Accepted, Rejected, Cancelled] {
                assert!(!terminal.can_transition_to(&next), "{terminal} -> {next}");
            }
        }
        assert!(!Draft.can_transition_to(&Accepted));
        assert!(!Unknown("x".into()).can_transition_to(&Sent));
    }

    #[test]
    fn generate_response_accepts_either_id_field() {
        let by_id: GenerateResponse = serde_json::from_str(r#"{"id": 12, "status": "draft"}"#).unwrap();
        let by_contract_id: GenerateResponse =
            serde_json::from_str(r#"{"contractId": 34}"#).unwrap();
        let with_null_id: GenerateResponse =
            serde_json::from_str(r#"{"id": null, "contractId": 56}"#).unwrap();
        assert_eq!(by_id.contract_ref(), Some(ContractRef { id: 12 }));
        assert_eq!(by_contract_id.contract_ref(), Some(ContractRef { id: 34 }));
        assert_eq!(with_null_id.contract_ref(), Some(ContractRef { id: 56 }));
    }

    #[test]
    fn generate_response_without_id_has_no_ref() {
        for body in ["{}", r#"{"message": "ok"}"#, "[]", "null"] {
            let response: GenerateResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.contract_ref(), None, "{body}");
        }
    }

    #[test]
    fn non_positive_ids_are_not_contracts() {
        for body in [r#"{"id": 0}"#, r#"{"id": -4}"#, r#"{"contractId": 0}"#] {
            let response: GenerateResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.contract_ref(), None, "{body}");
        }
    }

    #[test]
    fn generate_request_omits_absent_scope() {
        let request = GenerateRequest {
            planner_id: 3,
            month: 6,
            year: 2024,
            musician_id: None,
            assignment_ids: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"plannerId": 3, "month": 6, "year": 2024})
        );
    }
}
