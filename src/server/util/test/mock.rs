use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

use super::seed::{
    TEST_CHARACTER_ID, TEST_CORPORATION_ID, TEST_END_STATION_ID, TEST_START_STATION_ID,
};

pub fn mock_courier_contract(contract_id: i64, assignee_id: i64) -> Value {
    json!({
        "contract_id": contract_id,
        "type": "courier",
        "status": "outstanding",
        "availability": "alliance",
        "assignee_id": assignee_id,
        "acceptor_id": 0,
        "issuer_id": TEST_CHARACTER_ID,
        "issuer_corporation_id": TEST_CORPORATION_ID,
        "start_location_id": TEST_START_STATION_ID,
        "end_location_id": TEST_END_STATION_ID,
        "collateral": 1_000_000.0,
        "reward": 25_000_000.0,
        "volume": 50_000.0,
        "days_to_complete": 3,
        "date_issued": "2026-08-01T12:00:00Z",
        "date_expired": "2026-09-01T12:00:00Z",
        "for_corporation": false
    })
}

pub fn mock_item_exchange_contract(contract_id: i64, assignee_id: i64) -> Value {
    json!({
        "contract_id": contract_id,
        "type": "item_exchange",
        "status": "outstanding",
        "availability": "alliance",
        "assignee_id": assignee_id,
        "acceptor_id": 0,
        "issuer_id": TEST_CHARACTER_ID,
        "issuer_corporation_id": TEST_CORPORATION_ID,
        "date_issued": "2026-08-01T12:00:00Z",
        "date_expired": "2026-09-01T12:00:00Z"
    })
}

pub async fn mock_contracts_endpoint(
    server: &mut ServerGuard,
    corporation_id: i64,
    page: u32,
    pages: u32,
    contracts: Value,
    expected_requests: usize,
) -> Mock {
    server
        .mock(
            "GET",
            format!("/corporations/{corporation_id}/contracts/").as_str(),
        )
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-pages", &pages.to_string())
        .with_body(contracts.to_string())
        .expect(expected_requests)
        .create_async()
        .await
}

/// Contracts endpoint that answers an outage status for every request.
pub async fn mock_contracts_outage_endpoint(
    server: &mut ServerGuard,
    corporation_id: i64,
    status: usize,
    expected_requests: usize,
) -> Mock {
    server
        .mock(
            "GET",
            format!("/corporations/{corporation_id}/contracts/").as_str(),
        )
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(status)
        .expect(expected_requests)
        .create_async()
        .await
}

pub async fn mock_station_endpoint(
    server: &mut ServerGuard,
    station_id: i64,
    name: &str,
    expected_requests: usize,
) -> Mock {
    let body = json!({
        "station_id": station_id,
        "name": name,
        "system_id": 30000142,
        "type_id": 52678
    });

    server
        .mock("GET", format!("/universe/stations/{station_id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create_async()
        .await
}

pub async fn mock_structure_endpoint(
    server: &mut ServerGuard,
    structure_id: i64,
    name: &str,
    expected_requests: usize,
) -> Mock {
    let body = json!({
        "name": name,
        "solar_system_id": 30000142,
        "type_id": 35832,
        "owner_id": TEST_CORPORATION_ID
    });

    server
        .mock("GET", format!("/universe/structures/{structure_id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create_async()
        .await
}

/// ESI answers 403 for structures the token has no docking access to.
pub async fn mock_forbidden_structure_endpoint(
    server: &mut ServerGuard,
    structure_id: i64,
    expected_requests: usize,
) -> Mock {
    server
        .mock("GET", format!("/universe/structures/{structure_id}/").as_str())
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "Forbidden"}).to_string())
        .expect(expected_requests)
        .create_async()
        .await
}

pub async fn mock_character_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    name: &str,
    corporation_id: i64,
    expected_requests: usize,
) -> Mock {
    let body = json!({
        "name": name,
        "corporation_id": corporation_id
    });

    server
        .mock("GET", format!("/characters/{character_id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create_async()
        .await
}

pub async fn mock_corporation_endpoint(
    server: &mut ServerGuard,
    corporation_id: i64,
    name: &str,
    alliance_id: Option<i64>,
    expected_requests: usize,
) -> Mock {
    let body = json!({
        "name": name,
        "ticker": "FRGT",
        "alliance_id": alliance_id
    });

    server
        .mock("GET", format!("/corporations/{corporation_id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create_async()
        .await
}
