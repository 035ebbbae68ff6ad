use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use gym_api::app::build_router;
use gym_api::config::Config;
use gym_api::services::auth::clock::Clock;
use gym_api::services::auth::factory::build_auth_services;
use gym_api::services::auth::identity::{
    IdentityRecord, IdentitySource, IdentitySourceError, StaticIdentitySource,
};
use gym_api::services::auth::{Claims, Role};
use gym_api::services::auth::signing::SigningKey;
use gym_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

/// Clock the tests can move forward.
struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    fn starting_now() -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(Utc::now().timestamp()),
        })
    }

    fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    fn timestamp(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.now.load(Ordering::SeqCst), 0).unwrap()
    }
}

struct DownSource;

#[async_trait]
impl IdentitySource for DownSource {
    fn backend_name(&self) -> &'static str {
        "down"
    }

    async fn find_identity(
        &self,
        _identifier: &str,
    ) -> Result<Option<IdentityRecord>, IdentitySourceError> {
        Err(IdentitySourceError::Backend("connection reset".to_string()))
    }
}

/// Lookup that never answers.
struct HangingSource;

#[async_trait]
impl IdentitySource for HangingSource {
    fn backend_name(&self) -> &'static str {
        "hanging"
    }

    async fn find_identity(
        &self,
        _identifier: &str,
    ) -> Result<Option<IdentityRecord>, IdentitySourceError> {
        std::future::pending().await
    }
}

fn test_config() -> Config {
    config_with(&[])
}

fn config_with(extra: &[(&str, &str)]) -> Config {
    Config::from_vars(|key| {
        if key == "JWT_SECRET" {
            return Some(SECRET.to_string());
        }
        extra
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .unwrap()
}

fn identities() -> Arc<dyn IdentitySource> {
    Arc::new(StaticIdentitySource::new([
        IdentityRecord {
            subject_id: "123".to_string(),
            identifier: "owner@demo.com".to_string(),
            display_name: "Demo Owner".to_string(),
            role: Role::Owner,
            secret: "password123".to_string(),
        },
        IdentityRecord {
            subject_id: "900".to_string(),
            identifier: "amy@demo.com".to_string(),
            display_name: "Amy".to_string(),
            role: Role::Member,
            secret: "letmein".to_string(),
        },
    ]))
}

fn app_with(identities: Arc<dyn IdentitySource>, clock: Arc<ManualClock>) -> Router {
    app_with_config(test_config(), identities, clock)
}

fn app_with_config(
    config: Config,
    identities: Arc<dyn IdentitySource>,
    clock: Arc<ManualClock>,
) -> Router {
    let (issuer, verifier) = build_auth_services(&config, identities, clock).unwrap();
    build_router(AppState::new(issuer, verifier), &config)
}

fn app(clock: Arc<ManualClock>) -> Router {
    app_with(identities(), clock)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn login_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(router: &Router, identifier: &str, secret: &str) -> String {
    let (status, body) = send(
        router,
        login_request(json!({"identifier": identifier, "secret": secret})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_returns_token_and_principal() {
    let router = app(ManualClock::starting_now());

    let (status, body) = send(
        &router,
        login_request(json!({"identifier": "owner@demo.com", "secret": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86_400);
    assert_eq!(
        body["principal"],
        json!({
            "id": "123",
            "identifier": "owner@demo.com",
            "display_name": "Demo Owner",
            "role": "owner",
        })
    );
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn login_accepts_email_and_password_fields() {
    let router = app(ManualClock::starting_now());
    let (status, body) = send(
        &router,
        login_request(json!({"email": "owner@demo.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"]["role"], "owner");
}

#[tokio::test]
async fn wrong_secret_and_unknown_identifier_get_the_same_response() {
    let router = app(ManualClock::starting_now());

    let wrong_secret = send(
        &router,
        login_request(json!({"identifier": "owner@demo.com", "secret": "nope"})),
    )
    .await;
    let unknown = send(
        &router,
        login_request(json!({"identifier": "ghost@demo.com", "secret": "password123"})),
    )
    .await;

    assert_eq!(wrong_secret.0, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_secret.1,
        json!({"success": false, "error": "Invalid credentials"})
    );
    assert_eq!(wrong_secret, unknown);
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let router = app(ManualClock::starting_now());
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Invalid request body"})
    );
}

#[tokio::test]
async fn oversized_login_body_is_payload_too_large() {
    let router = app_with_config(
        config_with(&[("BODY_LIMIT_BYTES", "64")]),
        identities(),
        ManualClock::starting_now(),
    );
    let padding = "x".repeat(256);

    let (status, body) = send(
        &router,
        login_request(json!({"identifier": padding, "secret": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        body,
        json!({"success": false, "error": "Request body too large"})
    );
}

#[tokio::test]
async fn slow_request_times_out_with_an_error_body() {
    let router = app_with_config(
        config_with(&[
            ("REQUEST_TIMEOUT_SECONDS", "1"),
            ("IDENTITY_LOOKUP_TIMEOUT_MS", "60000"),
        ]),
        Arc::new(HangingSource),
        ManualClock::starting_now(),
    );

    let (status, body) = send(
        &router,
        login_request(json!({"identifier": "owner@demo.com", "secret": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({"success": false, "error": "Request timed out"}));
}

#[tokio::test]
async fn identity_outage_is_a_server_error() {
    let router = app_with(Arc::new(DownSource), ManualClock::starting_now());
    let (status, body) = send(
        &router,
        login_request(json!({"identifier": "owner@demo.com", "secret": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Identity service unavailable");
}

#[tokio::test]
async fn gate_rejects_missing_and_malformed_headers() {
    let router = app(ManualClock::starting_now());

    let cases = [
        (None, "No token provided"),
        (Some("Token abc"), "Invalid token format"),
        (Some("Bearer "), "Invalid token format"),
        (Some("bearer abc"), "Invalid token format"),
        (Some("Bearer abc"), "Invalid or expired token"),
    ];

    for (authorization, message) in cases {
        let (status, body) = send(&router, get_with_auth("/api/members", authorization)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization:?}");
        assert_eq!(
            body,
            json!({"success": false, "error": message}),
            "{authorization:?}"
        );
    }
}

#[tokio::test]
async fn owner_scenario_valid_within_ttl_then_expired() {
    let clock = ManualClock::starting_now();
    let router = app(clock.clone());

    let token = login(&router, "owner@demo.com", "password123").await;
    let bearer = format!("Bearer {token}");

    let (status, body) = send(&router, get_with_auth("/api/members", Some(&bearer))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Still inside the 24h window.
    clock.advance(23 * 3_600);
    let (status, _) = send(&router, get_with_auth("/api/dashboard/stats", Some(&bearer))).await;
    assert_eq!(status, StatusCode::OK);

    // Past expiry.
    clock.advance(3_600 + 1);
    let (status, body) = send(&router, get_with_auth("/api/members", Some(&bearer))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn repeated_requests_with_the_same_token_succeed() {
    let router = app(ManualClock::starting_now());
    let token = login(&router, "owner@demo.com", "password123").await;
    let bearer = format!("Bearer {token}");

    let (_, first) = send(&router, get_with_auth("/api/plans", Some(&bearer))).await;
    let (_, second) = send(&router, get_with_auth("/api/plans", Some(&bearer))).await;
    assert_eq!(first["success"], true);
    assert_eq!(first, second);
}

#[tokio::test]
async fn token_signed_with_another_key_is_rejected() {
    let clock = ManualClock::starting_now();
    let router = app(clock.clone());

    let now = clock.timestamp();
    let forged = SigningKey::from_secret(b"not-the-server-key")
        .unwrap()
        .sign(&Claims {
            subject_id: "123".to_string(),
            identifier: "owner@demo.com".to_string(),
            display_name: "Demo Owner".to_string(),
            role: Role::Owner,
            issued_at: now,
            expires_at: now + 3_600,
        })
        .unwrap();

    let (status, body) = send(
        &router,
        get_with_auth("/api/subscriptions", Some(&format!("Bearer {forged}"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_from_a_compatible_issuer_is_accepted() {
    // Anything HS256-signed with the shared key and carrying the same claims verifies.
    let clock = ManualClock::starting_now();
    let router = app(clock.clone());

    let now = clock.timestamp();
    let token = SigningKey::from_secret(SECRET.as_bytes())
        .unwrap()
        .sign(&Claims {
            subject_id: "77".to_string(),
            identifier: "desk@demo.com".to_string(),
            display_name: "Desk".to_string(),
            role: Role::Staff,
            issued_at: now,
            expires_at: now + 60,
        })
        .unwrap();

    let (status, _) = send(
        &router,
        get_with_auth("/api/plans", Some(&format!("Bearer {token}"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn owner_can_create_members() {
    let router = app(ManualClock::starting_now());
    let token = login(&router, "owner@demo.com", "password123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/members")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"fullName": "Ann Lee", "email": "ann@example.com", "phone": "555"})
                .to_string(),
        ))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullName"], "Ann Lee");
    assert!(body["data"]["joinDate"].is_string());
}

#[tokio::test]
async fn creating_a_member_requires_all_fields() {
    let router = app(ManualClock::starting_now());
    let token = login(&router, "owner@demo.com", "password123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/members")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"fullName": "Ann Lee"}).to_string()))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Missing required fields"})
    );
}

#[tokio::test]
async fn malformed_member_body_is_bad_request() {
    let router = app(ManualClock::starting_now());
    let token = login(&router, "owner@demo.com", "password123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/members")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Invalid request body"})
    );
}

#[tokio::test]
async fn member_role_cannot_create_members() {
    let router = app(ManualClock::starting_now());
    let token = login(&router, "amy@demo.com", "letmein").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/members")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"fullName": "Ann Lee", "email": "ann@example.com", "phone": "555"})
                .to_string(),
        ))
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_is_public() {
    let router = app(ManualClock::starting_now());
    let (status, body) = send(&router, get_with_auth("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_routes_are_not_found_rather_than_unauthorized() {
    let router = app(ManualClock::starting_now());
    let response = router
        .clone()
        .oneshot(get_with_auth("/api/does-not-exist", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id_and_no_store() {
    let router = app(ManualClock::starting_now());
    let response = router
        .clone()
        .oneshot(login_request(
            json!({"identifier": "owner@demo.com", "secret": "password123"}),
        ))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}
