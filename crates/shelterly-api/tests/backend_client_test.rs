#![allow(clippy::unwrap_used)]
// Integration tests for `BackendClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelterly_api::types::{CreateClientRequest, ShelterSearchQuery, WireId};
use shelterly_api::{BackendClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let client = BackendClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn shelter_json(id: i64, name: &str, availability: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "addressLine1": "123 San Fernando Rd",
        "city": "San Jose",
        "state": "CA",
        "zipCode": "95112",
        "latitude": 37.33,
        "longitude": -121.89,
        "totalCapacity": 10,
        "currentAvailability": availability,
        "shelterType": "CONGREGATE",
        "allowsPets": true,
        "allowsPartner": false,
        "active": true,
        "lastUpdated": "2025-04-12T09:30:00"
    })
}

// ── Shelters ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_shelters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            shelter_json(1, "Casa A", 1),
            shelter_json(2, "Hope Village", 0),
        ])))
        .mount(&server)
        .await;

    let shelters = client.list_shelters().await.unwrap();
    assert_eq!(shelters.len(), 2);
    assert_eq!(shelters[0].name, "Casa A");
    assert_eq!(shelters[0].id, WireId::Number(1));
    assert_eq!(shelters[1].current_availability, 0);
    assert_eq!(shelters[0].shelter_type.as_deref(), Some("CONGREGATE"));
}

#[tokio::test]
async fn test_search_sends_only_present_keys() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters/search"))
        .and(query_param("shelterType", "TINY_HOME"))
        .and(query_param("allowsPets", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([shelter_json(3, "Tiny Homes", 4)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ShelterSearchQuery {
        shelter_type: Some("TINY_HOME".into()),
        allows_pets: Some(true),
        ..ShelterSearchQuery::default()
    };
    let shelters = client.search_shelters(&query).await.unwrap();
    assert_eq!(shelters.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let query_string = requests[0].url.query().unwrap_or_default().to_owned();
    assert!(!query_string.contains("allowsPartner"));
    assert!(!query_string.contains("isActive"));
}

#[tokio::test]
async fn test_search_without_criteria_has_empty_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client
        .search_shelters(&ShelterSearchQuery::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_reserve_bed_posts_client_id_and_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .and(body_json(json!({ "clientId": 42 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .reserve_bed(&WireId::Number(1), &WireId::Number(42))
        .await
        .unwrap();
}

// ── Clients ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_client() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .and(body_json(json!({ "name": "J. Doe", "caseworkerNotes": "" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "status": "SEEKING_PLACEMENT",
            "registrationDate": "2025-04-12T10:00:00",
            "caseworkerNotes": ""
        })))
        .mount(&server)
        .await;

    let created = client
        .create_client(&CreateClientRequest {
            name: "J. Doe".into(),
            caseworker_notes: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, WireId::Number(42));
    assert_eq!(created.status.as_deref(), Some("SEEKING_PLACEMENT"));
    assert_eq!(created.name, None);
}

// ── Tasks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_assign_and_complete_task() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/tasks/7/assign"))
        .and(body_json(json!({ "clientId": "42" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/tasks/7/complete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.assign_task(&WireId::Number(7), "42").await.unwrap();
    client.complete_task(&WireId::Number(7)).await.unwrap();
}

#[tokio::test]
async fn test_delete_task_uses_admin_route() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/tasks/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_task(&WireId::Number(7)).await.unwrap();
}

// ── Analytics ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_task_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/analytics/task-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalTasks": 5,
            "openTasks": 2,
            "assignedTasks": 2,
            "completedTasks": 1
        })))
        .mount(&server)
        .await;

    let summary = client.task_summary().await.unwrap();
    assert_eq!(summary.total_tasks, 5);
    assert_eq!(summary.average_completion_time, None);
}

// ── Role header ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_role_header_is_attached_when_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(header("X-User-Role", "caseworker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        BackendClient::new(&server.uri(), Some("caseworker"), &TransportConfig::default()).unwrap();
    client.list_clients().await.unwrap();
}

#[tokio::test]
async fn test_role_header_absent_without_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None, &TransportConfig::default()).unwrap();
    client.list_shelters().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("x-user-role"));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_401_maps_to_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    assert!(err.is_unauthorized(), "expected Unauthorized, got {err:?}");
}

#[tokio::test]
async fn test_403_maps_to_fixed_permission_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/analytics/shelter-summary"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Admins only" })),
        )
        .mount(&server)
        .await;

    let err = client.shelter_summary().await.unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(
        err.to_string(),
        "You do not have permission to perform this action."
    );
}

#[tokio::test]
async fn test_server_error_passes_message_through() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "Reservation failed: Shelter/client not found, no availability, or client link failed."
        })))
        .mount(&server)
        .await;

    let err = client
        .reserve_bed(&WireId::Number(1), &WireId::Number(42))
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.starts_with("Reservation failed"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_message_uses_fallback() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list_tasks().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "An error occurred");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_shelters().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let client = BackendClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();
    let err = client.list_shelters().await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got {err:?}");
}
