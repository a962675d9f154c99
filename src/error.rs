use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::contracts::responses::BulkReport;

/// Every failure the admin gateway can surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// The generate call succeeded but named no contract.
    #[error("Generate response for planner {planner_id} did not include a contract id (expected `id` or `contractId`)")]
    MissingContractId { planner_id: i64 },
    /// Non-2xx answer from the booking backend, message kept verbatim.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Built through [`AppError::transport`], which drops the request url.
    #[error("Booking backend unreachable: {0}")]
    Transport(reqwest::Error),
    #[error("Unexpected response from booking backend: {0}")]
    Decode(#[from] serde_json::Error),
    /// Local precondition failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("Cannot move from `{from}` to `{to}`")]
    InvalidTransition { from: String, to: String },
    #[error("{} of {} updates failed; retry the remaining dates", .0.failed.len(), .0.total())]
    PartialBulkFailure(BulkReport),
    #[error("All {} updates failed", .0.total())]
    BulkFailure(BulkReport),
    #[error("{0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Token lookups carry the response token in the url path, so the url
    /// never travels with the error.
    pub fn transport(error: reqwest::Error) -> Self {
        Self::Transport(error.without_url())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidTransition { .. })
    }

    pub fn bulk_report(&self) -> Option<&BulkReport> {
        match self {
            Self::PartialBulkFailure(report) | Self::BulkFailure(report) => Some(report),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::PartialBulkFailure(_) => StatusCode::MULTI_STATUS,
            Self::MissingContractId { .. }
            | Self::Transport(_)
            | Self::Decode(_)
            | Self::BulkFailure(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Some(report) = self.bulk_report() {
            body["report"] = serde_json::to_value(report).unwrap_or_default();
        }
        HttpResponse::build(status).json(body)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::responses::BulkFailureItem;

    #[test]
    fn upstream_status_and_message_pass_through() {
        let err = AppError::Http {
            status: 422,
            message: "Contract already sent".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Contract already sent");
    }

    #[test]
    fn partial_and_total_bulk_failures_differ() {
        let report = BulkReport {
            succeeded: vec![1, 2],
            failed: vec![BulkFailureItem {
                date_id: 3,
                error: "boom".to_string(),
            }],
        };
        let partial = AppError::PartialBulkFailure(report.clone());
        let total = AppError::BulkFailure(BulkReport {
            succeeded: vec![],
            failed: report.failed.clone(),
        });
        assert_eq!(partial.status_code(), StatusCode::MULTI_STATUS);
        assert_eq!(total.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(partial.to_string(), "1 of 3 updates failed; retry the remaining dates");
        assert_eq!(total.to_string(), "All 1 updates failed");
    }

    #[test]
    fn missing_contract_id_names_the_field() {
        let err = AppError::MissingContractId { planner_id: 4 };
        assert!(err.to_string().contains("contract id"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
