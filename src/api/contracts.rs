use reqwest::Method;

use super::ApiClient;
use crate::error::AppResult;
use crate::models::ResponseToken;
use crate::models::contracts::{ContractMusician, GenerateRequest, GenerateResponse, MonthlyContract};

impl ApiClient {
    /// POST monthly-contracts/generate
    ///
    /// Returns the response untouched; turning it into a `ContractRef` is the
    /// orchestrator's job.
    pub async fn generate_contracts(&self, body: &GenerateRequest) -> AppResult<GenerateResponse> {
        let request = self
            .request(Method::POST, &["monthly-contracts", "generate"])
            .json(body);
        self.execute(
            request,
            &format!(
                "generate planner={} month={}/{} musician={:?}",
                body.planner_id, body.month, body.year, body.musician_id
            ),
        )
        .await
    }

    /// POST monthly-contracts/{id}/send
    pub async fn send_contract(&self, contract_id: i64) -> AppResult<serde_json::Value> {
        let id = contract_id.to_string();
        let request = self.request(Method::POST, &["monthly-contracts", &id, "send"]);
        self.execute(request, &format!("send contract={contract_id}"))
            .await
    }

    /// GET monthly-contracts/{id}
    pub async fn get_contract(&self, contract_id: i64) -> AppResult<MonthlyContract> {
        let id = contract_id.to_string();
        let request = self.request(Method::GET, &["monthly-contracts", &id]);
        self.execute(request, &format!("get contract={contract_id}"))
            .await
    }

    /// GET monthly-contracts/{id}/musicians
    pub async fn get_contract_musicians(&self, contract_id: i64) -> AppResult<Vec<ContractMusician>> {
        let id = contract_id.to_string();
        let request = self.request(Method::GET, &["monthly-contracts", &id, "musicians"]);
        let musicians: Option<Vec<ContractMusician>> = self
            .execute(request, &format!("contract musicians contract={contract_id}"))
            .await?;
        Ok(musicians.unwrap_or_default())
    }

    /// GET monthly-contract-musicians/token/{token}
    pub async fn musician_contract_by_token(&self, token: &ResponseToken) -> AppResult<ContractMusician> {
        let request = self.request(
            Method::GET,
            &["monthly-contract-musicians", "token", token.as_str()],
        );
        self.execute(request, "musician contract by token").await
    }

    /// POST contracts/{id}/resend
    pub async fn resend_contract(&self, contract_id: i64) -> AppResult<serde_json::Value> {
        let id = contract_id.to_string();
        let request = self.request(Method::POST, &["contracts", &id, "resend"]);
        self.execute(request, &format!("resend contract={contract_id}"))
            .await
    }

    /// POST contracts/{id}/cancel
    pub async fn cancel_contract(&self, contract_id: i64) -> AppResult<serde_json::Value> {
        let id = contract_id.to_string();
        let request = self.request(Method::POST, &["contracts", &id, "cancel"]);
        self.execute(request, &format!("cancel contract={contract_id}"))
            .await
    }
}
