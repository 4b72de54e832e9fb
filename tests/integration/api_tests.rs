//! Integration tests against a throwaway upstream served on 127.0.0.1:0

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Multipart;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use inventory_console::{
    api,
    config::AppConfig,
    models::{
        contract::{Contract, ContractFile, NewContract},
        Building, StoredSession,
    },
    repository::MemoryTokenStore,
    services::{endpoints, Services},
    AppError, AppState,
};

fn jwt(subject: &str, exp_offset: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset;
    encode(
        &Header::default(),
        &json!({ "sub": subject, "exp": exp }),
        &EncodingKey::from_secret(b"upstream-secret"),
    )
    .unwrap()
}

/// Fake university API. Data routes accept only `valid_access`.
struct MockUpstream {
    valid_access: Mutex<String>,
    fresh_access: String,
    refresh_ok: bool,
    reject_everything: bool,
    refresh_calls: AtomicUsize,
    data_calls: AtomicUsize,
    uploads: AtomicUsize,
    room_filters: Mutex<Vec<String>>,
}

impl MockUpstream {
    fn new(refresh_ok: bool, reject_everything: bool) -> Arc<Self> {
        Arc::new(Self {
            valid_access: Mutex::new(String::new()),
            fresh_access: jwt("fresh", 3600),
            refresh_ok,
            reject_everything,
            refresh_calls: AtomicUsize::new(0),
            data_calls: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            room_filters: Mutex::new(Vec::new()),
        })
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default();
        !self.reject_everything && presented == *self.valid_access.lock().unwrap()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Given token not valid for any token type" })),
    )
        .into_response()
}

async fn refresh(State(upstream): State<Arc<MockUpstream>>) -> Response {
    upstream.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Give concurrent callers time to pile up behind the refresh
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    if !upstream.refresh_ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired" })),
        )
            .into_response();
    }
    *upstream.valid_access.lock().unwrap() = upstream.fresh_access.clone();
    Json(json!({ "access": upstream.fresh_access })).into_response()
}

async fn login(State(upstream): State<Arc<MockUpstream>>, Json(body): Json<Value>) -> Response {
    if body["username"] == "admin" && body["password"] == "secret" {
        *upstream.valid_access.lock().unwrap() = upstream.fresh_access.clone();
        Json(json!({ "access": upstream.fresh_access, "refresh": "refresh-after-login" }))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "No active account found with the given credentials" })),
        )
            .into_response()
    }
}

async fn buildings(State(upstream): State<Arc<MockUpstream>>, headers: HeaderMap) -> Response {
    upstream.data_calls.fetch_add(1, Ordering::SeqCst);
    if !upstream.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        { "id": 1, "name": "Главный корпус", "university": 1 },
        { "id": 2, "name": "Корпус Б", "university": 1 }
    ]))
    .into_response()
}

fn record_room(upstream: &MockUpstream, query: &HashMap<String, String>) {
    if let Some(room) = query.get("room") {
        upstream.room_filters.lock().unwrap().push(room.clone());
    }
}

/// Ignores the room filter, like the real endpoint sometimes does
async fn equipment(
    State(upstream): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    upstream.data_calls.fetch_add(1, Ordering::SeqCst);
    if !upstream.authorized(&headers) {
        return unauthorized();
    }
    record_room(&upstream, &query);
    Json(json!([
        { "id": 1, "type": 3, "room": 12, "name": "Epson EB-X49", "status": "NEW" },
        { "id": 2, "type": 2, "room": 12, "name": "ПК-1", "status": "WORKING" },
        { "id": 3, "type": 9, "room": 40, "name": "Dell P2422H", "status": "WORKING" },
        { "id": 4, "type": 2, "room": 12, "name": "ПК-2", "status": "NEEDS_REPAIR" }
    ]))
    .into_response()
}

async fn types_by_room(
    State(upstream): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    upstream.data_calls.fetch_add(1, Ordering::SeqCst);
    if !upstream.authorized(&headers) {
        return unauthorized();
    }
    record_room(&upstream, &query);
    Json(json!([
        { "type_id": 2, "name": "Компьютер", "count": 2 },
        { "type_id": 3, "name": "Проектор", "count": 1 }
    ]))
    .into_response()
}

async fn upload_contract(
    State(upstream): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !upstream.authorized(&headers) {
        return unauthorized();
    }

    let mut number = String::new();
    let mut file_len = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default() {
            "number" => number = field.text().await.unwrap(),
            "file" => file_len = field.bytes().await.unwrap().len(),
            _ => {}
        }
    }
    upstream.uploads.fetch_add(1, Ordering::SeqCst);

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 31,
            "number": number,
            "file": format!("/media/contracts/{}-bytes.pdf", file_len),
            "valid_until": "2027-06-30"
        })),
    )
        .into_response()
}

async fn spawn_upstream(upstream: Arc<MockUpstream>) -> SocketAddr {
    let app = Router::new()
        .route("/api/token/refresh/", post(refresh))
        .route("/user/login/", post(login))
        .route("/university/buildings/", get(buildings))
        .route("/inventory/contracts/", post(upload_contract))
        .route("/inventory/equipment/", get(equipment))
        .route("/inventory/equipment/types-by-room/", get(types_by_room))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.base_url = format!("http://{}/", addr);
    config
}

/// Spawn the upstream and wire services to it over an in-memory token store
async fn setup(
    upstream: Arc<MockUpstream>,
    stored: StoredSession,
) -> (Services, Arc<MemoryTokenStore>, AppConfig) {
    let addr = spawn_upstream(upstream).await;
    let config = config_for(addr);
    let store = Arc::new(MemoryTokenStore::new(stored));
    let services = Services::new(&config, store.clone()).unwrap();
    (services, store, config)
}

fn stale_session() -> StoredSession {
    StoredSession {
        // Unexpired by its own claims, but the upstream has revoked it
        access_token: Some(jwt("stale", 3600)),
        refresh_token: Some("refresh-1".to_string()),
        last_path: Some("/rooms/12".to_string()),
        last_nav_label: Some("Аудитории".to_string()),
    }
}

#[tokio::test]
async fn unauthorized_request_is_refreshed_and_retried_once() {
    let upstream = MockUpstream::new(true, false);
    let (services, store, _) = setup(upstream.clone(), stale_session()).await;

    let resolution = services.session.bootstrap().await.unwrap();
    assert!(resolution.is_authenticated);
    assert_eq!(resolution.redirect, "/rooms/12");
    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 0);

    let buildings: Vec<Building> = services.gateway.get_json(endpoints::BUILDINGS).await.unwrap();
    assert_eq!(buildings.len(), 2);
    assert_eq!(buildings[0].name, "Главный корпус");

    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.data_calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.snapshot().await.access_token, Some(upstream.fresh_access.clone()));
}

#[tokio::test]
async fn failed_refresh_clears_tokens_and_surfaces_the_original_401() {
    let upstream = MockUpstream::new(false, false);
    let (services, store, _) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let err = services
        .gateway
        .get_json::<Vec<Building>>(endpoints::BUILDINGS)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Authentication(ref m) if m == "Given token not valid for any token type"),
        "unexpected error: {:?}",
        err
    );

    let stored = store.snapshot().await;
    assert_eq!(stored.access_token, None);
    assert_eq!(stored.refresh_token, None);
    assert_eq!(stored.last_path.as_deref(), Some("/rooms/12"));
    assert!(!services.session.current().await.is_authenticated());
    assert_eq!(upstream.data_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn second_unauthorized_is_returned_without_another_refresh() {
    let upstream = MockUpstream::new(true, true);
    let (services, _, _) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let result = services.gateway.get_json::<Vec<Building>>(endpoints::BUILDINGS).await;
    assert!(matches!(result, Err(AppError::Authentication(_))));

    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.data_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let upstream = MockUpstream::new(true, false);
    let (services, _, _) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let calls = (0..4).map(|_| {
        let gateway = services.gateway.clone();
        tokio::spawn(async move { gateway.get_json::<Vec<Building>>(endpoints::BUILDINGS).await })
    });
    for call in calls.collect::<Vec<_>>() {
        assert_eq!(call.await.unwrap().unwrap().len(), 2);
    }

    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn multipart_upload_is_replayed_after_refresh() {
    let upstream = MockUpstream::new(true, false);
    let (services, _, _) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let contract: Contract = services
        .contracts
        .create(NewContract {
            number: "K-2026/7".to_string(),
            valid_until: chrono::NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
            file: ContractFile {
                file_name: "k-2026-7.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                bytes: b"%PDF-1.7 contract".to_vec(),
            },
        })
        .await
        .unwrap();

    assert_eq!(contract.number, "K-2026/7");
    assert_eq!(contract.file.as_deref(), Some("/media/contracts/17-bytes.pdf"));
    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.uploads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_without_refresh_token_ends_unauthenticated() {
    let upstream = MockUpstream::new(true, false);
    let stored = StoredSession {
        access_token: Some(jwt("old", -60)),
        refresh_token: None,
        ..StoredSession::default()
    };
    let (services, store, _) = setup(upstream.clone(), stored).await;

    let resolution = services.session.bootstrap().await.unwrap();
    assert!(!resolution.is_authenticated);
    assert_eq!(resolution.redirect, "/login");
    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.snapshot().await.access_token, None);
}

fn app(services: Services, config: AppConfig) -> Router {
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn data_routes_redirect_to_login_without_a_session() {
    let upstream = MockUpstream::new(false, false);
    let (services, _, config) = setup(upstream.clone(), StoredSession::default()).await;

    let response = app(services, config)
        .oneshot(Request::builder().uri("/api/v1/buildings").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["redirect"], "/login");
    assert_eq!(upstream.data_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn first_request_bootstraps_from_the_refresh_token() {
    let upstream = MockUpstream::new(true, false);
    let stored = StoredSession {
        access_token: Some(jwt("old", -60)),
        ..stale_session()
    };
    let (services, _, config) = setup(upstream.clone(), stored).await;

    let response = app(services, config)
        .oneshot(Request::builder().uri("/api/v1/buildings").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.data_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_route_lands_on_the_saved_path() {
    let upstream = MockUpstream::new(false, false);
    let stored = StoredSession {
        last_path: Some("/contracts".to_string()),
        ..StoredSession::default()
    };
    let (services, store, config) = setup(upstream, stored).await;
    let app = app(services, config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/session/login")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username": "admin", "password": "secret"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_authenticated"], true);
    assert_eq!(body["redirect"], "/contracts");
    assert_eq!(store.snapshot().await.refresh_token.as_deref(), Some("refresh-after-login"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/session/login")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username": "admin", "password": "wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_batch_is_rejected_before_reaching_upstream() {
    let upstream = MockUpstream::new(true, false);
    let (services, _, config) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let response = app(services, config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/equipment/bulk-create")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "type": 3, "room": 12, "name": "Проектор", "quantity": 0 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["notifications"][0],
        "quantity: Ensure this value is greater than or equal to 1."
    );
}

#[tokio::test]
async fn room_equipment_is_filtered_grouped_and_paged() {
    let upstream = MockUpstream::new(true, false);
    let (services, _, config) = setup(upstream.clone(), stale_session()).await;
    services.session.bootstrap().await.unwrap();

    let response = app(services, config)
        .oneshot(
            Request::builder()
                .uri("/api/v1/rooms/12/equipment?page=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["room_id"], 12);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["total_items"], 2);

    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["type_id"], 2);
    assert_eq!(groups[0]["label"], "Компьютер");
    assert_eq!(groups[0]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(groups[0]["status_counts"]["working"], 1);
    assert_eq!(groups[0]["status_counts"]["needs_repair"], 1);
    assert_eq!(groups[1]["type_id"], 3);
    assert_eq!(groups[1]["status_counts"]["new"], 1);

    assert_eq!(body["type_breakdown"][0]["count"], 2);
    assert_eq!(body["type_breakdown"][1]["name"], "Проектор");

    // Both requests were rejected with the revoked token and retried after one refresh
    assert_eq!(upstream.refresh_calls.load(Ordering::SeqCst), 1);
    let filters = upstream.room_filters.lock().unwrap().clone();
    assert_eq!(filters, vec!["12".to_string(), "12".to_string()]);
}
