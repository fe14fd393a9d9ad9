//! Auth-boundary tests driven through the real router. These cover the
//! request paths that are decided before any database access: token checks
//! and body validation.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tower::ServiceExt;
use uuid::Uuid;

use imagevault::{app::build_app, state::AppState};

async fn body_message(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["message"].as_str().unwrap_or_default().to_string()
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(AppState::fake());
    let response = app.oneshot(request(Method::GET, "/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    for (method, uri) in [
        (Method::GET, "/api/favorites"),
        (Method::POST, "/api/favorites"),
        (Method::DELETE, "/api/favorites/all"),
        (Method::GET, "/api/recent-searches"),
        (Method::POST, "/api/recent-searches"),
        (Method::DELETE, "/api/recent-searches/all"),
        (Method::GET, "/api/admin/users"),
    ] {
        let app = build_app(AppState::fake());
        let response = app.oneshot(request(method.clone(), uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri}"
        );
        assert_eq!(body_message(response).await, "Not authorized, no token");
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = build_app(AppState::fake());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, "Basic abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authorized, no token");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = build_app(AppState::fake());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authorized, token failed");
}

#[derive(Serialize)]
struct TestClaims {
    sub: Uuid,
    roles: Vec<String>,
    iat: usize,
    exp: usize,
    iss: String,
    aud: String,
}

#[tokio::test]
async fn expired_token_is_rejected_with_expired_message() {
    // Claims matching AppState::fake()'s jwt config, expired well past the
    // verifier's 60s leeway.
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = TestClaims {
        sub: Uuid::new_v4(),
        roles: vec!["USER".into()],
        iat: (now - 600) as usize,
        exp: (now - 300) as usize,
        iss: "test-issuer".into(),
        aud: "test-aud".into(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test"),
    )
    .unwrap();

    let app = build_app(AppState::fake());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authorized, token expired");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = TestClaims {
        sub: Uuid::new_v4(),
        roles: vec!["USER".into()],
        iat: now as usize,
        exp: (now + 300) as usize,
        iss: "test-issuer".into(),
        aud: "test-aud".into(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"attacker-secret"),
    )
    .unwrap();

    let app = build_app(AppState::fake());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authorized, token failed");
}

#[tokio::test]
async fn register_requires_username_and_password() {
    for body in ["{}", r#"{"username":"alice"}"#, r#"{"password":"secret1"}"#] {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(json_request(Method::POST, "/api/auth/register", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            body_message(response).await,
            "Please provide username and password"
        );
    }
}

#[tokio::test]
async fn register_rejects_malformed_username() {
    let app = build_app(AppState::fake());
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            r#"{"username":"a b","password":"secret1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = build_app(AppState::fake());
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            r#"{"username":"alice","password":"abc"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(response).await, "Password too short");
}

#[tokio::test]
async fn login_and_token_alias_require_credentials() {
    for uri in ["/api/auth/login", "/api/token"] {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(json_request(Method::POST, uri, r#"{"username":"alice"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body_message(response).await,
            "Please provide username and password"
        );
    }
}
