#![allow(clippy::unwrap_used)]
// End-to-end tests for `Console` against a wiremock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelterly_core::reservation::GENERIC_FAILURE_MESSAGE;
use shelterly_core::session::{LoginCredentials, login};
use shelterly_core::{
    Console, ConsoleConfig, CoreError, DirectoryState, RecordId, ReservationInitiator,
    ReservationStage, ReservationState, ReserveControl, Role, SearchCriteria, Session,
};

// ── Helpers ─────────────────────────────────────────────────────────

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
        "allowsPets": false,
        "allowsPartner": false,
        "active": true
    })
}

fn caseworker() -> Session {
    login(&LoginCredentials {
        email: "demo@example.com".into(),
        password: SecretString::from("password".to_owned()),
        role: Role::Caseworker,
    })
    .unwrap()
}

async fn console(server: &MockServer, session: Option<Session>) -> Console {
    let config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    let console = Console::new(config, session);
    console.connect().await.unwrap();
    console
}

async fn mount_shelters_once(server: &MockServer, availability: i64) {
    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([shelter_json(1, "Casa A", availability)])),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

// ── Reservation flow ────────────────────────────────────────────────

#[tokio::test]
async fn test_reservation_end_to_end_disables_full_shelter() {
    let server = MockServer::start().await;
    mount_shelters_once(&server, 1).await;
    mount_shelters_once(&server, 0).await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .and(header("X-User-Role", "caseworker"))
        .and(body_json(json!({ "name": "J. Doe", "caseworkerNotes": "" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "status": "SEEKING_PLACEMENT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .and(body_json(json!({ "clientId": 42 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let console = console(&server, Some(caseworker())).await;
    console.fetch_all().await.unwrap();

    let views = console.shelter_views();
    assert_eq!(views[0].reserve, ReserveControl::Enabled);

    let mut initiator = ReservationInitiator::new(views[0].shelter.clone());
    console
        .submit_reservation(&mut initiator, "J. Doe", "")
        .await
        .unwrap();

    match initiator.state() {
        ReservationState::Success { client } => {
            assert_eq!(client.id, RecordId::Numeric(42));
            assert_eq!(client.name.as_deref(), Some("J. Doe"));
        }
        other => panic!("expected success, got {other:?}"),
    }

    let views = console.shelter_views();
    assert_eq!(views[0].shelter.name, "Casa A");
    assert_eq!(views[0].shelter.current_availability, 0);
    assert_eq!(views[0].reserve, ReserveControl::Disabled);

    console.disconnect().await;
}

#[tokio::test]
async fn test_reservation_failure_is_generic_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([shelter_json(1, "Casa A", 1)])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Reservation failed: Shelter/client not found, no availability, or client link failed."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let console = console(&server, Some(caseworker())).await;
    console.fetch_all().await.unwrap();
    let shelter = console.directory_snapshot().visible[0].clone();

    let mut initiator = ReservationInitiator::new(shelter);
    console
        .submit_reservation(&mut initiator, "J. Doe", "")
        .await
        .unwrap();

    assert_eq!(initiator.message().as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    match initiator.state() {
        ReservationState::Failed(failure) => {
            assert!(matches!(
                failure.stage,
                ReservationStage::BedReservation { .. }
            ));
            assert!(failure.can_retry_reservation());
        }
        other => panic!("expected failure, got {other:?}"),
    }

    console.fetch_all().await.unwrap();
    let views = console.shelter_views();
    assert_eq!(views[0].shelter.current_availability, 1);

    console.disconnect().await;
    // `.expect(1)` on each POST verifies nothing was retried.
}

#[tokio::test]
async fn test_manual_retry_reuses_created_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/shelters/1/reserve"))
        .and(body_json(json!({ "clientId": 42 })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([shelter_json(1, "Casa A", 1)])),
        )
        .mount(&server)
        .await;

    let console = console(&server, Some(caseworker())).await;
    console.fetch_all().await.unwrap();
    let shelter = console.directory_snapshot().visible[0].clone();

    let mut initiator = ReservationInitiator::new(shelter);
    console
        .submit_reservation(&mut initiator, "J. Doe", "")
        .await
        .unwrap();
    assert!(matches!(initiator.state(), ReservationState::Failed(_)));

    console.retry_reservation(&mut initiator).await.unwrap();
    assert!(matches!(initiator.state(), ReservationState::Success { .. }));

    console.disconnect().await;
}

#[tokio::test]
async fn test_reservation_requires_login() {
    let server = MockServer::start().await;
    mount_shelters_once(&server, 3).await;

    let console = console(&server, None).await;
    console.fetch_all().await.unwrap();

    let views = console.shelter_views();
    assert_eq!(views[0].reserve, ReserveControl::RequiresLogin);

    let mut initiator = ReservationInitiator::new(views[0].shelter.clone());
    let err = console
        .submit_reservation(&mut initiator, "J. Doe", "")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::LoginRequired { .. }));
    assert_eq!(initiator.state(), &ReservationState::Idle);

    console.disconnect().await;
}

// ── Directory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_false_criteria_search_equals_empty_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            shelter_json(1, "Casa A", 1),
            shelter_json(2, "Hope Village", 0),
        ])))
        .mount(&server)
        .await;

    let console = console(&server, None).await;

    console
        .search(SearchCriteria {
            allows_pets: false,
            ..SearchCriteria::default()
        })
        .await
        .unwrap();
    let with_false = console.directory_snapshot();

    console.search(SearchCriteria::default()).await.unwrap();
    let empty = console.directory_snapshot();

    assert_eq!(with_false.results.len(), empty.results.len());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[1].url.query(), None);

    console.disconnect().await;
}

#[tokio::test]
async fn test_stale_fetch_never_overwrites_fresher_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([shelter_json(1, "Stale", 1)]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/shelters/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([shelter_json(2, "Fresh", 1)])),
        )
        .mount(&server)
        .await;

    let console = console(&server, None).await;

    let (slow, fast) = tokio::join!(console.fetch_all(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        console
            .search(SearchCriteria {
                allows_pets: true,
                ..SearchCriteria::default()
            })
            .await
    });
    slow.unwrap();
    fast.unwrap();

    let snapshot = console.directory_snapshot();
    assert_eq!(snapshot.visible.len(), 1);
    assert_eq!(snapshot.visible[0].name, "Fresh");
    assert_eq!(snapshot.state, DirectoryState::Loaded);

    console.disconnect().await;
}

#[tokio::test]
async fn test_failed_load_keeps_previous_cache() {
    let server = MockServer::start().await;
    mount_shelters_once(&server, 4).await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let console = console(&server, None).await;
    console.fetch_all().await.unwrap();
    assert!(console.fetch_all().await.is_err());

    let snapshot = console.directory_snapshot();
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(
        snapshot.state,
        DirectoryState::Failed {
            message: "Failed to load shelters".into()
        }
    );

    console.disconnect().await;
}

// ── Session handling ────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_clears_session_and_role_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let console = console(&server, Some(caseworker())).await;
    let mut changes = console.session_changes();

    let err = console.list_clients().await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(console.session().is_none());
    assert!(changes.has_changed().unwrap());

    console.fetch_all().await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert!(!last.headers.contains_key("x-user-role"));

    console.disconnect().await;
}

#[tokio::test]
async fn test_forbidden_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/tasks/7"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let admin = login(&LoginCredentials {
        email: "admin@example.com".into(),
        password: SecretString::from("admin123".to_owned()),
        role: Role::Admin,
    })
    .unwrap();
    let console = console(&server, Some(admin)).await;

    let err = console
        .execute(shelterly_core::Command::DeleteTask {
            id: RecordId::Numeric(7),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "You do not have permission to perform this action."
    );
    assert!(console.session().is_some());

    console.disconnect().await;
}

#[tokio::test]
async fn test_admin_commands_need_admin_role_locally() {
    let server = MockServer::start().await;
    let console = console(&server, Some(caseworker())).await;

    let err = console.task_summary().await.unwrap_err();
    assert!(matches!(err, CoreError::RoleRequired { .. }));

    let err = console
        .execute(shelterly_core::Command::DeleteShelter {
            id: RecordId::Numeric(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::RoleRequired { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());

    console.disconnect().await;
}
