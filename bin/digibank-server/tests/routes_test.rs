use core::time::Duration;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use digibank_server::{App, TokenIssuer, create_router};
use digibank_test_utils::TestBank;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestServer {
    _dir: TempDir,
    router: Router,
}

impl TestServer {
    async fn new() -> Self {
        let (dir, engine) = TestBank::new().await.into_parts();
        let tokens = TokenIssuer::new("test-secret", Duration::from_secs(3600));
        let app = App::builder().engine(Arc::new(engine)).tokens(Arc::new(tokens)).build();

        Self { _dir: dir, router: create_router(app) }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.send(request.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn register(&self, email: &str, national_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "first_name": "Ana",
                    "last_name": "Lopez",
                    "national_id": national_id,
                    "email": email,
                    "password": "s3cret-pass",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["token"].as_str().unwrap().to_owned()
    }

    async fn open_account(&self, token: &str, body: Value) -> String {
        let (status, body) = self.post("/api/accounts", Some(token), body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["account"]["account_number"].as_str().unwrap().to_owned()
    }
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::new().await;

    assert_eq!(server.get("/health", None).await.0, StatusCode::OK);
    assert_eq!(server.get("/api/health", None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let server = TestServer::new().await;

    let (status, body) = server.get("/api/accounts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = server.get("/api/accounts", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_me() {
    let server = TestServer::new().await;

    let token = server.register("Ana@Example.com", "0801").await;

    let (status, body) = server.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = server
        .post("/api/auth/login", None, json!({"email": "ana@example.com", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");

    let (status, body) = server
        .post(
            "/api/auth/login",
            None,
            json!({"email": "ANA@example.com", "password": "s3cret-pass"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn duplicate_registration_and_missing_fields_are_bad_requests() {
    let server = TestServer::new().await;
    server.register("ana@example.com", "0801").await;

    let (status, body) = server
        .post(
            "/api/auth/register",
            None,
            json!({
                "first_name": "Another",
                "last_name": "Ana",
                "national_id": "0802",
                "email": "ana@example.com",
                "password": "pass",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email already registered");

    let (status, body) =
        server.post("/api/auth/register", None, json!({"email": "bob@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "first_name is required");
}

#[tokio::test]
async fn deposit_and_overdrawn_withdrawal() {
    let server = TestServer::new().await;
    let token = server.register("ana@example.com", "0801").await;
    let number = server
        .open_account(&token, json!({"account_type": "checking", "overdraft_limit": 1000}))
        .await;

    let (status, body) = server
        .post(
            "/api/transactions/deposit",
            Some(&token),
            json!({"account_number": number, "amount": 250.5}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["account"]["balance"], 250.5);
    assert_eq!(body["transaction"]["transaction_type"], "deposit");
    assert_eq!(body["transaction"]["description"], "Deposit");

    let (status, body) = server
        .post(
            "/api/transactions/withdraw",
            Some(&token),
            json!({"account_number": number, "amount": 1500}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "insufficient funds: available balance is 1250.5");

    let (status, body) = server
        .post(
            "/api/transactions/withdraw",
            Some(&token),
            json!({"account_number": number, "amount": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "amount must be greater than zero");

    let (status, body) = server.get("/api/transactions", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn deposit_beyond_the_balance_range_is_a_bad_request() {
    let server = TestServer::new().await;
    let token = server.register("ana@example.com", "111").await;
    let number = server.open_account(&token, json!({"account_type": "checking"})).await;
    let request = json!({"account_number": number, "amount": 5e28});

    let (status, body) =
        server.post("/api/transactions/deposit", Some(&token), request.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = server.post("/api/transactions/deposit", Some(&token), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "amount exceeds the supported balance range");
}

#[tokio::test]
async fn foreign_and_unknown_accounts() {
    let server = TestServer::new().await;
    let ana = server.register("ana@example.com", "0801").await;
    let bob = server.register("bob@example.com", "0802").await;
    let number = server.open_account(&ana, json!({"account_type": "savings"})).await;

    let (status, _) = server.get(&format!("/api/accounts/{number}"), Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server.get("/api/accounts/9999999999999999", Some(&ana)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "account not found");

    let (status, _) = server.get("/api/accounts/not-a-number", Some(&ana)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server.get("/api/accounts/id/1", Some(&ana)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["account_number"], number.as_str());
}

#[tokio::test]
async fn interest_is_rounded_on_output() {
    let server = TestServer::new().await;
    let token = server.register("ana@example.com", "0801").await;
    let number = server
        .open_account(&token, json!({"account_type": "savings", "opening_balance": 1000}))
        .await;

    let (status, body) = server
        .post("/api/operations/calculate-interest", Some(&token), json!({"account_number": number}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["interest"], 2.92);
    assert_eq!(body["account"]["balance"], 1002.92);
    assert_eq!(body["transaction"]["transaction_type"], "interest");
}

#[tokio::test]
async fn bill_payment_and_history() {
    let server = TestServer::new().await;
    let token = server.register("ana@example.com", "0801").await;
    let number = server
        .open_account(&token, json!({"account_type": "checking", "opening_balance": 100}))
        .await;

    let (status, body) = server
        .post(
            "/api/payments/process",
            Some(&token),
            json!({
                "account_number": number,
                "amount": 40,
                "service_type": "electricity",
                "reference": "INV-7",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["transaction"]["description"], "Payment of electricity - Ref: INV-7");

    let (status, body) = server.get("/api/payments/history", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, body) = server.get("/api/payments/categories", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let server = TestServer::new().await;
    let token = server.register("ana@example.com", "0801").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/transactions/deposit")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = server.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}
