//! HTTP-level tests for the Accounts API.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use micropay_hex::{AccountsService, inbound::AccountsServer};
use micropay_repo::SqliteAccountsRepo;
use micropay_types::{CreateTransactionRequest, LedgerNotifier, NotifyError};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Notifier that keeps every entry in memory.
#[derive(Clone, Default)]
struct RecordingNotifier {
    entries: Arc<Mutex<Vec<CreateTransactionRequest>>>,
}

#[async_trait]
impl LedgerNotifier for RecordingNotifier {
    async fn record(&self, entry: &CreateTransactionRequest) -> Result<(), NotifyError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Helper to create a router over an in-memory store.
async fn create_app() -> (Router, RecordingNotifier) {
    let repo = SqliteAccountsRepo::new("sqlite::memory:").await.unwrap();
    let notifier = RecordingNotifier::default();
    let service = AccountsService::new(repo, notifier.clone());
    (AccountsServer::new(service).router(), notifier)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn create_account(app: &Router, username: &str, balance: f64, can_overdraft: Value) {
    let (status, body) = send(
        app,
        post(
            "/Accounts/CreateAccount",
            json!({
                "username": username,
                "password": "secret",
                "balance": balance,
                "canOverdraft": can_overdraft
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!(true));
}

#[tokio::test]
async fn test_health() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_get_account() {
    let (app, _) = create_app().await;
    create_account(&app, "alice", 100.0, json!(true)).await;

    let (status, body) = send(&app, get("/Accounts/GetAccountByUsername?username=alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["balance"], 100.0);
    assert_eq!(body["canOverdraft"], true);
    assert!(body.get("createdDate").is_some());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_can_overdraft_accepts_integer_flag() {
    let (app, _) = create_app().await;
    create_account(&app, "bob", 0.0, json!(1)).await;

    let (_, body) = send(&app, get("/Accounts/GetAccountByUsername?username=bob")).await;

    assert_eq!(body["canOverdraft"], true);
}

#[tokio::test]
async fn test_create_duplicate_account_conflicts() {
    let (app, _) = create_app().await;
    create_account(&app, "alice", 100.0, json!(false)).await;

    let (status, body) = send(
        &app,
        post(
            "/Accounts/CreateAccount",
            json!({"username": "alice", "password": "x", "balance": 1.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn test_create_account_missing_password() {
    let (app, _) = create_app().await;

    let (status, body) = send(
        &app,
        post("/Accounts/CreateAccount", json!({"username": "alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_create_account_invalid_flag_is_400() {
    let (app, _) = create_app().await;

    let (status, body) = send(
        &app,
        post(
            "/Accounts/CreateAccount",
            json!({"username": "alice", "password": "x", "canOverdraft": 2}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("canOverdraft"));
}

#[tokio::test]
async fn test_create_account_without_content_type_is_400() {
    let (app, _) = create_app().await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/Accounts/CreateAccount")
        .body(Body::from(
            json!({"username": "alice", "password": "x"}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_get_balance() {
    let (app, _) = create_app().await;
    create_account(&app, "alice", 12.5, json!(false)).await;

    let (status, body) = send(&app, get("/Accounts/GetBalanceByUsername?username=alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "alice", "amount": 12.5}));
}

#[tokio::test]
async fn test_get_balance_unknown_is_404() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, get("/Accounts/GetBalanceByUsername?username=ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_get_balance_without_username_is_400() {
    let (app, _) = create_app().await;

    let (status, _) = send(&app, get("/Accounts/GetBalanceByUsername")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deposit_echoes_request_and_notifies() {
    let (app, notifier) = create_app().await;
    create_account(&app, "alice", 100.0, json!(false)).await;

    let (status, body) = send(
        &app,
        post("/Accounts/Deposit", json!({"username": "alice", "amount": 50.0})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "alice", "amount": 50.0}));

    let entries = notifier.entries.lock().unwrap().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "DEPOSIT");
    assert_eq!(entries[0].new_balance, 150.0);
}

#[tokio::test]
async fn test_withdraw_overdraft_rejected() {
    let (app, notifier) = create_app().await;
    create_account(&app, "TOCHANGE", 100.0, json!(false)).await;

    let (status, body) = send(
        &app,
        post(
            "/Accounts/Withdraw",
            json!({"username": "TOCHANGE", "amount": 150.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, balance) = send(
        &app,
        get("/Accounts/GetBalanceByUsername?username=TOCHANGE"),
    )
    .await;
    assert_eq!(balance["amount"], 100.0);
    assert!(notifier.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_withdraw_negative_amount_rejected() {
    let (app, _) = create_app().await;
    create_account(&app, "alice", 100.0, json!(false)).await;

    let (status, _) = send(
        &app,
        post("/Accounts/Withdraw", json!({"username": "alice", "amount": -5.0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deposit_mistyped_amount_is_400() {
    let (app, notifier) = create_app().await;
    create_account(&app, "alice", 100.0, json!(false)).await;

    let (status, body) = send(
        &app,
        post("/Accounts/Deposit", json!({"username": "alice", "amount": "abc"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].is_string());
    assert!(notifier.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_overflowing_balance_is_400() {
    let (app, notifier) = create_app().await;
    create_account(&app, "big", 1e308, json!(false)).await;

    let (status, body) = send(
        &app,
        post("/Accounts/Deposit", json!({"username": "big", "amount": 1e308})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, balance) = send(&app, get("/Accounts/GetBalanceByUsername?username=big")).await;
    assert_eq!(balance["amount"], 1e308);
    assert!(notifier.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_unknown_account_is_404() {
    let (app, _) = create_app().await;

    let (status, _) = send(
        &app,
        post("/Accounts/Deposit", json!({"username": "ghost", "amount": 5.0})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/Accounts/CreateAccount"].is_object());
}
