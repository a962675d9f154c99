use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::aggregation::{
    ContractBucket, MusicianGroup, PlannerStats, Selection, group_by_musician, group_fetched,
};
use crate::cache::QueryKey;
use crate::contracts::ContractService;
use crate::contracts::badge::{Badge, resolve_badge};
use crate::error::{AppError, AppResult};
use crate::models::assignments::{Assignment, ByMusicianResponse};
use crate::models::contracts::GenerateRequest;

/// Grouped assignments of a planner, read through the cache. The grouping
/// itself is recomputed from the cached payload on every call.
pub(crate) async fn load_groups(
    service: &ContractService,
    planner_id: i64,
) -> AppResult<BTreeMap<i64, MusicianGroup>> {
    let payload: ByMusicianResponse = service
        .cache()
        .get_or_fetch(QueryKey::AssignmentsByMusician { planner_id }, || {
            service.api().assignments_by_musician(planner_id)
        })
        .await?;
    Ok(group_fetched(payload))
}

/// GET /api/planners/{id}/assignments — the raw assignment list, grouped.
pub async fn get_assignments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let planner_id = path.into_inner();
    let service = &state.service;

    let assignments: Vec<Assignment> = service
        .cache()
        .get_or_fetch(QueryKey::PlannerAssignments { planner_id }, || {
            service.api().planner_assignments(planner_id)
        })
        .await?;
    let groups = group_by_musician(&assignments);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "plannerId": planner_id,
        "stats": PlannerStats::from_groups(&groups),
        "musicians": groups.values().map(MusicianGroupView::from).collect::<Vec<_>>(),
    })))
}

/// GET /api/planners/{id}/musicians — the contract view of a planner month.
pub async fn get_musician_groups(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let planner_id = path.into_inner();
    let groups = load_groups(&state.service, planner_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "plannerId": planner_id,
        "stats": PlannerStats::from_groups(&groups),
        "musicians": groups.values().map(MusicianGroupView::from).collect::<Vec<_>>(),
    })))
}

/// POST /api/planners/{id}/musicians/{musician_id}/selection — "select all"
/// checkbox state for the given ticked assignments.
pub async fn selection_state(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
    body: web::Json<SelectionRequest>,
) -> AppResult<HttpResponse> {
    let (planner_id, musician_id) = path.into_inner();
    let groups = load_groups(&state.service, planner_id).await?;
    let group = groups.get(&musician_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "Musician {musician_id} has no assignments in planner {planner_id}"
        ))
    })?;

    let selection: Selection = body.into_inner().selected_ids.into_iter().collect();

    Ok(HttpResponse::Ok().json(SelectionResponse {
        all_selected: selection.all_selected(group),
        selected_eligible: selection.selected_eligible(group),
        selected_locked: selection.selected_locked(group),
    }))
}

/// POST /api/planners/{id}/contracts — generate contracts and, unless
/// `send` is false, dispatch them.
///
/// With a `musicianId`, only that musician's selected assignments are used,
/// and every selected id must still be open for contracting.
pub async fn generate_contracts(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<GenerateContractsRequest>,
) -> AppResult<HttpResponse> {
    let planner_id = path.into_inner();
    let body = body.into_inner();
    let service = &state.service;

    let assignment_ids = match body.musician_id {
        Some(musician_id) => {
            Some(checked_selection(service, planner_id, musician_id, body.assignment_ids).await?)
        }
        None => Some(body.assignment_ids).filter(|ids| !ids.is_empty()),
    };

    let request = GenerateRequest {
        planner_id,
        month: body.month,
        year: body.year,
        musician_id: body.musician_id,
        assignment_ids,
    };

    let contract = if body.send {
        service.generate_and_send(&request).await?
    } else {
        service.generate(&request).await?
    };

    Ok(HttpResponse::Created().json(serde_json::json!({
        "contractId": contract.id,
        "sent": body.send,
    })))
}

async fn checked_selection(
    service: &ContractService,
    planner_id: i64,
    musician_id: i64,
    assignment_ids: Vec<i64>,
) -> AppResult<Vec<i64>> {
    if assignment_ids.is_empty() {
        return Err(AppError::validation(
            "Select at least one assignment to include in the contract",
        ));
    }

    let groups = load_groups(service, planner_id).await?;
    let group = groups.get(&musician_id).ok_or_else(|| {
        AppError::validation(format!(
            "Musician {musician_id} has no assignments in planner {planner_id}"
        ))
    })?;

    let known = group.assignment_ids();
    let foreign: Vec<i64> = assignment_ids
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();
    if !foreign.is_empty() {
        return Err(AppError::validation(format!(
            "Assignments {foreign:?} do not belong to musician {musician_id}"
        )));
    }

    let selection: Selection = assignment_ids.into_iter().collect();
    let locked = selection.selected_locked(group);
    if !locked.is_empty() {
        return Err(AppError::validation(format!(
            "Assignments {locked:?} are already under contract"
        )));
    }
    Ok(selection.selected_eligible(group))
}

// ── Request / response DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    #[serde(default)]
    pub selected_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub all_selected: bool,
    pub selected_eligible: Vec<i64>,
    pub selected_locked: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContractsRequest {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub musician_id: Option<i64>,
    #[serde(default)]
    pub assignment_ids: Vec<i64>,
    #[serde(default = "default_send")]
    pub send: bool,
}

fn default_send() -> bool {
    true
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MusicianGroupView<'a> {
    #[serde(flatten)]
    group: &'a MusicianGroup,
    eligible_ids: Vec<i64>,
    contracts: Vec<ContractBucketView<'a>>,
}

#[derive(Serialize)]
struct ContractBucketView<'a> {
    #[serde(flatten)]
    bucket: ContractBucket<'a>,
    badge: Option<Badge>,
}

impl<'a> From<&'a MusicianGroup> for MusicianGroupView<'a> {
    fn from(group: &'a MusicianGroup) -> Self {
        let contracts = group
            .by_contract()
            .into_iter()
            .map(|bucket| ContractBucketView {
                badge: bucket.status.as_ref().map(resolve_badge),
                bucket,
            })
            .collect();

        Self {
            group,
            eligible_ids: group.eligible().map(|a| a.id).collect(),
            contracts,
        }
    }
}
