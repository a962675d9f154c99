#![allow(dead_code)]

use booking_admin::api::ApiClient;
use booking_admin::cache::QueryCache;
use booking_admin::contracts::ContractService;
use booking_admin::models::contract_dates::ContractDate;
use mockito::{Server, ServerGuard};
use serde_json::{Value, json};

pub struct TestSetup {
    pub server: ServerGuard,
    pub service: ContractService,
}

/// A contract service pointed at a fresh mock booking backend.
pub async fn test_setup() -> TestSetup {
    let server = Server::new_async().await;
    let api = ApiClient::new(&server.url(), None).expect("mock server url should be valid");

    TestSetup {
        server,
        service: ContractService::new(api, QueryCache::default()),
    }
}

pub fn date_json(id: i64, status: &str, fee: f64) -> Value {
    json!({
        "id": id,
        "contractId": 70,
        "date": format!("2024-06-{:02}", id % 28 + 1),
        "fee": fee,
        "status": status,
    })
}

pub fn contract_date(id: i64, status: &str, fee: f64) -> ContractDate {
    serde_json::from_value(date_json(id, status, fee)).expect("fixture date should decode")
}

/// `assignments-by-musician` payload: musician 5 with two open dates plus
/// a placeholder row and a malformed key.
pub fn planner_payload() -> Value {
    json!({
        "5": {
            "musicianName": "Ana Ruiz",
            "assignments": [
                {"id": 2, "musicianId": 5, "fee": 200, "date": "2024-06-03"},
                {"id": 1, "musicianId": 5, "fee": 100, "date": "2024-06-01"},
                {"id": 4, "musicianId": 5, "fee": 90, "date": "2024-06-07",
                 "contractId": 31, "contractStatus": "sent"}
            ]
        },
        "999": {
            "musicianName": "No assignments yet",
            "assignments": [{"id": 3, "musicianId": 999, "fee": 50, "date": "2024-06-01"}]
        },
        "undefined": {"assignments": []}
    })
}

pub fn musician_contract_json(dates: Vec<Value>) -> Value {
    json!({
        "id": 70,
        "monthlyContractId": 12,
        "musicianId": 5,
        "musicianName": "Ana Ruiz",
        "month": 6,
        "year": 2024,
        "status": "sent",
        "token": "tok-7f2c",
        "dates": dates,
    })
}
