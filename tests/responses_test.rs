//! Musician date responses, single and bulk.
//!
//! Run with: `cargo test --test responses_test`
mod util;

use std::net::{IpAddr, Ipv4Addr};

use booking_admin::AppError;
use booking_admin::cache::QueryKey;
use booking_admin::models::ResponseToken;
use booking_admin::models::contract_dates::DateStatus;
use mockito::Matcher;
use serde_json::json;

use util::{TestSetup, contract_date, date_json, test_setup};

const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));

fn status_path(date_id: i64) -> String {
    format!("/monthly-contract-dates/{date_id}/status")
}

#[tokio::test]
async fn accept_sends_signature_and_ip() {
    let TestSetup { mut server, service } = test_setup().await;

    let update = server
        .mock("PUT", status_path(1).as_str())
        .match_body(Matcher::PartialJson(json!({
            "status": "accepted",
            "musicianSignature": "AR",
            "ipAddress": "203.0.113.9",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(date_json(1, "accepted", 150.0).to_string())
        .create_async()
        .await;

    let date = contract_date(1, "pending", 150.0);
    let updated = service.accept(&date, "  AR ", CLIENT_IP).await.unwrap();

    assert_eq!(updated.status, DateStatus::Accepted);
    update.assert_async().await;
}

#[tokio::test]
async fn accept_falls_back_to_local_copy_without_echo() {
    let TestSetup { mut server, service } = test_setup().await;

    server
        .mock("PUT", status_path(2).as_str())
        .with_status(204)
        .create_async()
        .await;

    let date = contract_date(2, "pending", 80.0);
    let updated = service.accept(&date, "AR", CLIENT_IP).await.unwrap();

    assert_eq!(updated.status, DateStatus::Accepted);
    assert_eq!(updated.musician_signature.as_deref(), Some("AR"));
    assert_eq!(updated.ip_address.as_deref(), Some("203.0.113.9"));
}

#[tokio::test]
async fn blank_signature_or_reason_never_reaches_backend() {
    let TestSetup { mut server, service } = test_setup().await;

    let update = server
        .mock("PUT", Matcher::Regex(r"^/monthly-contract-dates/\d+/status$".to_string()))
        .expect(0)
        .create_async()
        .await;

    let date = contract_date(1, "pending", 150.0);
    assert!(service.accept(&date, "   ", CLIENT_IP).await.unwrap_err().is_validation());
    assert!(service.reject(&date, "").await.unwrap_err().is_validation());

    let dates = vec![date.clone(), contract_date(2, "pending", 90.0)];
    assert!(service.accept_all(&dates, "", CLIENT_IP).await.unwrap_err().is_validation());
    assert!(service.reject_all(&dates, " ").await.unwrap_err().is_validation());

    update.assert_async().await;
}

#[tokio::test]
async fn answered_date_cannot_be_answered_again() {
    let TestSetup { mut server, service } = test_setup().await;

    let update = server
        .mock("PUT", status_path(3).as_str())
        .expect(0)
        .create_async()
        .await;

    let date = contract_date(3, "signed", 150.0);
    let err = service.reject(&date, "double booked").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidTransition { .. }));
    update.assert_async().await;
}

#[tokio::test]
async fn staff_can_cancel_an_accepted_date() {
    let TestSetup { mut server, service } = test_setup().await;

    let update = server
        .mock("PUT", status_path(4).as_str())
        .match_body(Matcher::Json(json!({"status": "cancelled", "notes": "gig moved"})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let date = contract_date(4, "accepted", 150.0);
    let updated = service.cancel_date(&date, Some("gig moved")).await.unwrap();

    assert_eq!(updated.status, DateStatus::Cancelled);
    update.assert_async().await;
}

#[tokio::test]
async fn accept_all_reports_partial_failure() {
    let TestSetup { mut server, service } = test_setup().await;

    for id in [1, 2] {
        server
            .mock("PUT", status_path(id).as_str())
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
    }
    server
        .mock("PUT", status_path(3).as_str())
        .with_status(500)
        .with_body(r#"{"message": "Date is locked"}"#)
        .create_async()
        .await;
    let skipped = server
        .mock("PUT", status_path(4).as_str())
        .expect(0)
        .create_async()
        .await;

    let dates = vec![
        contract_date(1, "pending", 100.0),
        contract_date(2, "pending", 100.0),
        contract_date(3, "pending", 100.0),
        contract_date(4, "rejected", 100.0),
    ];
    let err = service.accept_all(&dates, "AR", CLIENT_IP).await.unwrap_err();

    let AppError::PartialBulkFailure(report) = err else {
        panic!("expected a partial failure, got {err:?}");
    };
    assert_eq!(report.succeeded, vec![1, 2]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].date_id, 3);
    assert_eq!(report.failed[0].error, "Date is locked");
    skipped.assert_async().await;
}

#[tokio::test]
async fn reject_all_reports_total_failure() {
    let TestSetup { mut server, service } = test_setup().await;

    server
        .mock("PUT", Matcher::Regex(r"^/monthly-contract-dates/\d+/status$".to_string()))
        .with_status(502)
        .expect(2)
        .create_async()
        .await;

    let dates = vec![
        contract_date(5, "pending", 100.0),
        contract_date(6, "pending", 100.0),
    ];
    let err = service.reject_all(&dates, "touring").await.unwrap_err();

    match err {
        AppError::BulkFailure(report) => {
            assert!(report.succeeded.is_empty());
            assert_eq!(report.failed.len(), 2);
        }
        other => panic!("expected a total failure, got {other:?}"),
    }
}

#[tokio::test]
async fn bulk_with_nothing_pending_is_rejected_locally() {
    let TestSetup { service, .. } = test_setup().await;

    let dates = vec![contract_date(1, "accepted", 100.0)];
    let err = service.accept_all(&dates, "AR", CLIENT_IP).await.unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn successful_response_drops_cached_contract_reads() {
    let TestSetup { mut server, service } = test_setup().await;

    let token = ResponseToken::new("tok-7f2c");
    let cache = service.cache();
    cache
        .set(QueryKey::MusicianContract { token: token.clone() }, &json!({}))
        .await;
    cache
        .set(QueryKey::ContractMusicians { contract_id: 12 }, &json!([]))
        .await;
    cache
        .set(QueryKey::AssignmentsByMusician { planner_id: 3 }, &json!({}))
        .await;
    server
        .mock("PUT", status_path(1).as_str())
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let date = contract_date(1, "pending", 100.0);
    service.reject(&date, "touring").await.unwrap();

    assert!(!cache.contains(&QueryKey::MusicianContract { token }));
    assert!(!cache.contains(&QueryKey::ContractMusicians { contract_id: 12 }));
    assert!(cache.contains(&QueryKey::AssignmentsByMusician { planner_id: 3 }));
}
