use std::net::IpAddr;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::ContractService;
use crate::cache::QueryPattern;
use crate::error::{AppError, AppResult};
use crate::models::contract_dates::{ContractDate, DateStatus, UpdateDateStatus};

/// Outcome of a bulk accept/reject.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub succeeded: Vec<i64>,
    pub failed: Vec<BulkFailureItem>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailureItem {
    pub date_id: i64,
    pub error: String,
}

fn require_signature(signature: &str) -> AppResult<&str> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(AppError::validation("Enter your initials to sign"));
    }
    Ok(signature)
}

fn require_reason(reason: &str) -> AppResult<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A reason is required to reject a date"));
    }
    Ok(reason)
}

fn ensure_transition(date: &ContractDate, next: DateStatus) -> AppResult<()> {
    if date.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            from: date.status.to_string(),
            to: next.to_string(),
        })
    }
}

fn pending_dates(dates: &[ContractDate]) -> AppResult<Vec<&ContractDate>> {
    let pending: Vec<&ContractDate> = dates
        .iter()
        .filter(|d| d.status == DateStatus::Pending)
        .collect();
    if pending.is_empty() {
        return Err(AppError::validation("There are no pending dates to respond to"));
    }
    Ok(pending)
}

fn accept_body(signature: &str, ip: IpAddr) -> UpdateDateStatus {
    UpdateDateStatus {
        status: DateStatus::Accepted,
        notes: None,
        ip_address: Some(ip.to_string()),
        musician_signature: Some(signature.to_string()),
    }
}

fn reject_body(reason: &str) -> UpdateDateStatus {
    UpdateDateStatus {
        status: DateStatus::Rejected,
        notes: Some(reason.to_string()),
        ip_address: None,
        musician_signature: None,
    }
}

/// The copy of `date` after `body` was applied, used when the backend does
/// not echo the updated record.
fn applied(date: &ContractDate, body: UpdateDateStatus) -> ContractDate {
    ContractDate {
        status: body.status,
        notes: body.notes.or_else(|| date.notes.clone()),
        ip_address: body.ip_address.or_else(|| date.ip_address.clone()),
        musician_signature: body
            .musician_signature
            .or_else(|| date.musician_signature.clone()),
        ..date.clone()
    }
}

impl ContractService {
    /// Musician accepts one pending date, signing with their initials.
    pub async fn accept(&self, date: &ContractDate, signature: &str, ip: IpAddr) -> AppResult<ContractDate> {
        let signature = require_signature(signature)?;
        ensure_transition(date, DateStatus::Accepted)?;
        self.apply(date, accept_body(signature, ip)).await
    }

    pub async fn reject(&self, date: &ContractDate, reason: &str) -> AppResult<ContractDate> {
        let reason = require_reason(reason)?;
        ensure_transition(date, DateStatus::Rejected)?;
        self.apply(date, reject_body(reason)).await
    }

    /// Staff override: cancels a date whatever its current answer.
    pub async fn cancel_date(&self, date: &ContractDate, notes: Option<&str>) -> AppResult<ContractDate> {
        let body = UpdateDateStatus {
            status: DateStatus::Cancelled,
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            ip_address: None,
            musician_signature: None,
        };
        self.apply(date, body).await
    }

    pub async fn accept_all(&self, dates: &[ContractDate], signature: &str, ip: IpAddr) -> AppResult<BulkReport> {
        let signature = require_signature(signature)?;
        let pending = pending_dates(dates)?;
        self.apply_bulk(&pending, || accept_body(signature, ip)).await
    }

    pub async fn reject_all(&self, dates: &[ContractDate], reason: &str) -> AppResult<BulkReport> {
        let reason = require_reason(reason)?;
        let pending = pending_dates(dates)?;
        self.apply_bulk(&pending, || reject_body(reason)).await
    }

    async fn apply(&self, date: &ContractDate, body: UpdateDateStatus) -> AppResult<ContractDate> {
        let response = self.api.update_date_status(date.id, &body).await?;
        info!("Date {} is now {}", date.id, body.status);
        self.invalidate_responses().await;

        Ok(serde_json::from_value::<ContractDate>(response).unwrap_or_else(|_| applied(date, body)))
    }

    /// Fires every update at once and waits for all of them; there is no
    /// ordering between the calls.
    async fn apply_bulk(
        &self,
        dates: &[&ContractDate],
        body: impl Fn() -> UpdateDateStatus,
    ) -> AppResult<BulkReport> {
        let calls = dates.iter().map(|date| {
            let body = body();
            async move {
                let result = self.api.update_date_status(date.id, &body).await;
                (date.id, result)
            }
        });
        let results = join_all(calls).await;

        let mut report = BulkReport::default();
        for (date_id, result) in results {
            match result {
                Ok(_) => report.succeeded.push(date_id),
                Err(e) => report.failed.push(BulkFailureItem {
                    date_id,
                    error: e.to_string(),
                }),
            }
        }

        if !report.succeeded.is_empty() {
            self.invalidate_responses().await;
        }

        if report.failed.is_empty() {
            info!("Updated {} dates", report.succeeded.len());
            Ok(report)
        } else if report.succeeded.is_empty() {
            warn!("All {} date updates failed", report.failed.len());
            Err(AppError::BulkFailure(report))
        } else {
            warn!(
                "{} of {} date updates failed",
                report.failed.len(),
                report.total()
            );
            Err(AppError::PartialBulkFailure(report))
        }
    }

    async fn invalidate_responses(&self) {
        self.cache
            .invalidate(&[QueryPattern::AnyContract, QueryPattern::AnyMusicianContract])
            .await;
    }
}
