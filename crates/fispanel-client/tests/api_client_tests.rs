//! Client tests against an in-process fake admin API

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use fispanel_client::{ApiClient, ClientConfig, ClientError};
use fispanel_types::{LicenseStatus, LoginRequest};
use serde_json::{json, Value};

const TOKEN: &str = "tok-123";

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "admin" && body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({"success": true, "token": TOKEN, "user": {"username": "admin", "id": 1}})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Invalid credentials"})),
        )
    }
}

async fn licenses(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }
    (
        StatusCode::OK,
        Json(json!({"data": [
            {"id": 1, "license_key": "FIS-1", "company_name": "Acme", "status": "active",
             "days_remaining": "30", "max_devices": 2, "active_devices": "1"}
        ]})),
    )
}

async fn update_license(
    State(recorded): State<Recorded>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(json!({"id": id, "body": body}));
    Json(json!({"success": true}))
}

async fn delete_license(Path(id): Path<i64>) -> Json<Value> {
    if id == 1 {
        Json(json!({"success": true}))
    } else {
        Json(json!({"success": false, "error": "License has active devices"}))
    }
}

async fn receipts() -> Json<Value> {
    Json(json!({"data": [
        {"Yazdırma Zamanı": "01.03.2025 10:00", "Fiş No": "7", "Firma Adı": "Acme, Ltd", "Tutar (TL)": 120.5}
    ]}))
}

async fn session_export(Path(id): Path<i64>) -> Json<Value> {
    if id == 9 {
        Json(json!({"success": true, "data": {
            "KDV %10": [{"Fiş No": "1"}],
            "KDV %20": [{"Fiş No": "2"}]
        }}))
    } else {
        Json(json!({"success": false}))
    }
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_backend() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/admin/licenses", get(licenses))
        .route("/api/admin/licenses/:id", put(update_license).delete(delete_license))
        .route("/api/admin/users/:id", delete(broken))
        .route("/api/admin/receipts/export", get(receipts))
        .route("/api/admin/sessions/:id/export", get(session_export))
        .route("/api/admin/dashboard/today", get(broken))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), recorded)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn test_login_success_and_rejection() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    let credentials = api
        .login(&LoginRequest {
            username: "admin".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(credentials.token, TOKEN);
    assert_eq!(credentials.user.username, "admin");
    assert_eq!(credentials.user.extra["id"], 1);

    let err = api
        .login(&LoginRequest {
            username: "admin".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::LoginRejected(ref m) if m == "Invalid credentials"));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (url, _) = spawn_backend().await;

    let licenses = client(&url).with_token(TOKEN).licenses().await.unwrap();
    assert_eq!(licenses.len(), 1);
    assert_eq!(licenses[0].days_remaining, Some(30));

    let err = client(&url).with_token("stale").licenses().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_admin_call_without_token_fails_locally() {
    let (url, _) = spawn_backend().await;
    let err = client(&url).licenses().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
}

#[tokio::test]
async fn test_update_bodies() {
    let (url, recorded) = spawn_backend().await;
    let api = client(&url).with_token(TOKEN);

    api.add_license_days(4, 30).await.unwrap();
    api.set_license_status(4, LicenseStatus::Suspended).await.unwrap();

    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![
            json!({"id": 4, "body": {"action": "add_days", "days": 30}}),
            json!({"id": 4, "body": {"action": "set_status", "status": "suspended"}}),
        ]
    );
}

#[tokio::test]
async fn test_rejected_action_carries_server_message() {
    let (url, _) = spawn_backend().await;
    let api = client(&url).with_token(TOKEN);

    api.delete_license(1).await.unwrap();
    let err = api.delete_license(2).await.unwrap_err();
    assert_eq!(err.to_string(), "License has active devices");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (url, _) = spawn_backend().await;
    let api = client(&url).with_token(TOKEN);

    let err = api.delete_user(3).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "API Error: 500");
    assert!(api.today().await.is_err());
}

#[tokio::test]
async fn test_receipt_export_keeps_column_order() {
    let (url, _) = spawn_backend().await;
    let rows = client(&url)
        .with_token(TOKEN)
        .export_receipts("2025-03-01", "2025-03-31")
        .await
        .unwrap();
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Yazdırma Zamanı", "Fiş No", "Firma Adı", "Tutar (TL)"]);
}

#[tokio::test]
async fn test_session_export() {
    let (url, _) = spawn_backend().await;
    let api = client(&url).with_token(TOKEN);

    let export = api.session_export(9).await.unwrap();
    assert_eq!(export.rows().len(), 2);
    assert!(matches!(
        api.session_export(10).await.unwrap_err(),
        ClientError::Rejected(_)
    ));
}

async fn users() -> Json<Value> {
    Json(json!({"data": [{"id": 1, "pc_name": "KASA-1", "is_online": true}]}))
}

async fn daily_stats() -> Json<Value> {
    Json(json!({"data": [{"stat_date": "2025-03-01", "receipts": "4", "amount": "40.5"}]}))
}

#[tokio::test]
async fn test_dashboard_absorbs_today_failure() {
    let (url, _) = spawn_backend().await;
    let extra = Router::new()
        .route("/api/admin/licenses", get(licenses))
        .route("/api/admin/users", get(users))
        .route("/api/admin/stats/daily", get(daily_stats))
        .route("/api/admin/dashboard/today", get(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, extra).await.unwrap();
    });

    let snapshot = client(&format!("http://{addr}"))
        .with_token(TOKEN)
        .dashboard()
        .await
        .unwrap();
    assert_eq!(snapshot.licenses.len(), 1);
    assert_eq!(snapshot.users.len(), 1);
    assert_eq!(snapshot.stats[0].receipts, 4);
    assert!(snapshot.today.is_none());

    // the first backend has no users endpoint, so the batch fails
    assert!(client(&url).with_token(TOKEN).dashboard().await.is_err());
}
