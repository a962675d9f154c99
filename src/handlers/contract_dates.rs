use std::net::IpAddr;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::contracts::load_contract_musicians;
use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::contract_dates::DateStatus;

/// PUT /api/contract-dates/{id}/status — staff sets one date's status.
///
/// The date is looked up inside `monthlyContractId` first, so the local
/// transition rules apply before anything is sent. Accepting on a
/// musician's behalf still needs their initials.
pub async fn update_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<StaffStatusRequest>,
) -> AppResult<HttpResponse> {
    let date_id = path.into_inner();
    let body = body.into_inner();
    let service = &state.service;

    let musicians = load_contract_musicians(service, body.monthly_contract_id).await?;
    let date = musicians
        .iter()
        .flat_map(|m| m.dates.iter())
        .find(|d| d.id == date_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Date {date_id} is not part of contract {}",
                body.monthly_contract_id
            ))
        })?;

    let updated = match body.status {
        DateStatus::Accepted => {
            let ip = match body.ip_address.as_deref().map(str::parse::<IpAddr>) {
                Some(Ok(ip)) => ip,
                Some(Err(_)) => return Err(AppError::validation("ipAddress is not a valid address")),
                None => state.client_ip(&req)?,
            };
            let signature = body.musician_signature.as_deref().unwrap_or_default();
            service.accept(date, signature, ip).await?
        }
        DateStatus::Rejected => {
            service
                .reject(date, body.notes.as_deref().unwrap_or_default())
                .await?
        }
        DateStatus::Cancelled => service.cancel_date(date, body.notes.as_deref()).await?,
        DateStatus::Pending => {
            return Err(AppError::InvalidTransition {
                from: date.status.to_string(),
                to: DateStatus::Pending.to_string(),
            });
        }
    };

    Ok(HttpResponse::Ok().json(updated))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStatusRequest {
    pub monthly_contract_id: i64,
    pub status: DateStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub musician_signature: Option<String>,
}
