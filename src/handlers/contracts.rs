use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::AppState;
use crate::cache::QueryKey;
use crate::contracts::ContractService;
use crate::contracts::badge::{Badge, resolve_badge};
use crate::contracts::summary::{ContractProgress, ResponseSummary};
use crate::error::AppResult;
use crate::models::contracts::{ContractMusician, MonthlyContract};

pub(crate) async fn load_contract_musicians(
    service: &ContractService,
    contract_id: i64,
) -> AppResult<Vec<ContractMusician>> {
    service
        .cache()
        .get_or_fetch(QueryKey::ContractMusicians { contract_id }, || {
            service.api().get_contract_musicians(contract_id)
        })
        .await
}

/// GET /api/monthly-contracts/{id} — contract detail with its badge.
pub async fn get_contract(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let contract_id = path.into_inner();
    let service = &state.service;

    let contract: MonthlyContract = service
        .cache()
        .get_or_fetch(QueryKey::MonthlyContract { contract_id }, || {
            service.api().get_contract(contract_id)
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "badge": resolve_badge(&contract.status),
        "contract": contract,
    })))
}

/// GET /api/monthly-contracts/{id}/musicians — per-musician sub-contracts
/// with their answer summaries and the overall progress.
pub async fn get_contract_musicians(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let contract_id = path.into_inner();
    let musicians = load_contract_musicians(&state.service, contract_id).await?;

    let views: Vec<ContractMusicianView<'_>> = musicians.iter().map(ContractMusicianView::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contractId": contract_id,
        "progress": ContractProgress::from_musicians(&musicians),
        "musicians": views,
    })))
}

/// POST /api/monthly-contracts/{id}/send
pub async fn send_contract(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let contract_id = path.into_inner();
    state.service.send(contract_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Contract {contract_id} sent"),
    })))
}

/// POST /api/contracts/{id}/resend
pub async fn resend_contract(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let contract_id = path.into_inner();
    state.service.resend(contract_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Contract {contract_id} resent"),
    })))
}

/// POST /api/contracts/{id}/cancel
pub async fn cancel_contract(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let contract_id = path.into_inner();
    state.service.cancel(contract_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Contract {contract_id} cancelled"),
    })))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContractMusicianView<'a> {
    #[serde(flatten)]
    musician: &'a ContractMusician,
    badge: Badge,
    summary: ResponseSummary,
}

impl<'a> From<&'a ContractMusician> for ContractMusicianView<'a> {
    fn from(musician: &'a ContractMusician) -> Self {
        Self {
            musician,
            badge: resolve_badge(&musician.status),
            summary: ResponseSummary::from_dates(&musician.dates),
        }
    }
}
