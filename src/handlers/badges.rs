use actix_web::{HttpResponse, web};

use crate::contracts::badge::resolve_badge_str;

/// GET /api/badges/{status} — badge for any status string; unknown values
/// get the neutral badge.
pub async fn get_badge(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(resolve_badge_str(&path.into_inner()))
}
