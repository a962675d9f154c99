use reqwest::Method;

use super::ApiClient;
use crate::error::AppResult;
use crate::models::assignments::{Assignment, ByMusicianResponse};

impl ApiClient {
    /// GET monthly-planners/{id}/assignments-by-musician
    pub async fn assignments_by_musician(&self, planner_id: i64) -> AppResult<ByMusicianResponse> {
        let id = planner_id.to_string();
        let request = self.request(
            Method::GET,
            &["monthly-planners", &id, "assignments-by-musician"],
        );
        let response: Option<ByMusicianResponse> = self
            .execute(request, &format!("assignments-by-musician planner={planner_id}"))
            .await?;
        Ok(response.unwrap_or_default())
    }

    /// GET monthly-planners/{id}/assignments
    pub async fn planner_assignments(&self, planner_id: i64) -> AppResult<Vec<Assignment>> {
        let id = planner_id.to_string();
        let request = self.request(Method::GET, &["monthly-planners", &id, "assignments"]);
        let response: Option<Vec<Assignment>> = self
            .execute(request, &format!("assignments planner={planner_id}"))
            .await?;
        Ok(response.unwrap_or_default())
    }
}
