use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use lectio_api::router::build_router;
use lectio_api::state::AppState;
use lectio_auth::TokenSigner;
use lectio_domain::id::UserId;
use lectio_testing::auth::{MockAuth, TEST_JWT_SECRET};

use crate::helpers::hasher;

// Requests here never reach the database: they are answered by health probes
// or rejected before token subjects are resolved.
fn app() -> axum::Router {
    let state = AppState::new(
        DatabaseConnection::Disconnected,
        TokenSigner::new(TEST_JWT_SECRET),
        hasher(),
    );
    build_router(state)
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_returns_200_with_request_id() {
    let resp = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn entries_without_token_return_401() {
    let resp = app()
        .oneshot(Request::get("/entries").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["kind"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn expired_token_returns_401() {
    let auth = MockAuth::new(UserId(1));
    let mut request = Request::get("/users/1").body(Body::empty()).unwrap();
    *request.headers_mut() = auth.expired_headers();

    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_another_secret_returns_401() {
    let auth = MockAuth::with_secret(UserId(1), "not-the-server-secret");
    let mut request = Request::get("/tags").body(Body::empty()).unwrap();
    *request.headers_mut() = auth.headers();

    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
