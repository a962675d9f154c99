use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::AppState;
use crate::cache::QueryKey;
use crate::contracts::ContractService;
use crate::contracts::badge::resolve_badge;
use crate::contracts::summary::ResponseSummary;
use crate::error::{AppError, AppResult};
use crate::models::ResponseToken;
use crate::models::contract_dates::DateStatus;
use crate::models::contracts::ContractMusician;

async fn load_by_token(service: &ContractService, raw: String) -> AppResult<ContractMusician> {
    let token = ResponseToken::new(raw);
    if token.is_empty() {
        return Err(AppError::NotFound("Contract link is not valid".to_string()));
    }

    service
        .cache()
        .get_or_fetch(QueryKey::MusicianContract { token: token.clone() }, || async {
            service.api().musician_contract_by_token(&token).await
        })
        .await
}

/// GET /api/respond/{token} — the musician's contract behind a response link.
pub async fn get_by_token(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let musician = load_by_token(&state.service, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "badge": resolve_badge(&musician.status),
        "summary": ResponseSummary::from_dates(&musician.dates),
        "contract": musician,
    })))
}

/// PUT /api/respond/{token}/dates/{date_id} — accept or reject one date.
pub async fn respond_to_date(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
    body: web::Json<DateResponseRequest>,
) -> AppResult<HttpResponse> {
    let (token, date_id) = path.into_inner();
    let body = body.into_inner();
    let service = &state.service;

    let musician = load_by_token(service, token).await?;
    let date = musician
        .dates
        .iter()
        .find(|d| d.id == date_id)
        .ok_or_else(|| AppError::NotFound(format!("Date {date_id} is not part of this contract")))?;

    let updated = match body.status {
        DateStatus::Accepted => {
            let ip = state.client_ip(&req)?;
            service
                .accept(date, body.signature.as_deref().unwrap_or_default(), ip)
                .await?
        }
        DateStatus::Rejected => {
            service
                .reject(date, body.reason.as_deref().unwrap_or_default())
                .await?
        }
        other => {
            return Err(AppError::validation(format!(
                "A date can only be accepted or rejected, not {other}"
            )));
        }
    };

    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/respond/{token}/accept-all
pub async fn accept_all(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BulkAcceptRequest>,
) -> AppResult<HttpResponse> {
    let service = &state.service;
    let musician = load_by_token(service, path.into_inner()).await?;
    if body.signature.trim().is_empty() {
        return Err(AppError::validation("Enter your initials to sign"));
    }
    let ip = state.client_ip(&req)?;

    let report = service
        .accept_all(&musician.dates, &body.signature, ip)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /api/respond/{token}/reject-all
pub async fn reject_all(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BulkRejectRequest>,
) -> AppResult<HttpResponse> {
    let service = &state.service;
    let musician = load_by_token(service, path.into_inner()).await?;

    let report = service.reject_all(&musician.dates, &body.reason).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateResponseRequest {
    pub status: DateStatus,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkAcceptRequest {
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkRejectRequest {
    #[serde(default)]
    pub reason: String,
}
