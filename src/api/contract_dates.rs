use reqwest::Method;

use super::ApiClient;
use crate::error::AppResult;
use crate::models::contract_dates::UpdateDateStatus;

impl ApiClient {
    /// PUT monthly-contract-dates/{id}/status
    ///
    /// The body may carry an IP address and signature, so only the id and the
    /// target status are logged.
    pub async fn update_date_status(
        &self,
        date_id: i64,
        body: &UpdateDateStatus,
    ) -> AppResult<serde_json::Value> {
        let id = date_id.to_string();
        let request = self
            .request(Method::PUT, &["monthly-contract-dates", &id, "status"])
            .json(body);
        self.execute(
            request,
            &format!("update date={date_id} status={}", body.status),
        )
        .await
    }
}
