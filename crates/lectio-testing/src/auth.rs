//! Bearer headers for integration tests.
//!
//! Tokens are signed for real with the test secret, so requests go through
//! the same validation path as production traffic.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use lectio_auth::TokenSigner;
use lectio_domain::id::UserId;

/// Secret shared by `MockAuth` and the app state built in tests.
pub const TEST_JWT_SECRET: &str = "lectio-test-secret";

pub struct MockAuth {
    pub user_id: UserId,
    signer: TokenSigner,
}

impl MockAuth {
    pub fn new(user_id: UserId) -> Self {
        Self::with_secret(user_id, TEST_JWT_SECRET)
    }

    pub fn with_secret(user_id: UserId, secret: &str) -> Self {
        Self {
            user_id,
            signer: TokenSigner::new(secret),
        }
    }

    pub fn token(&self) -> String {
        self.signer.issue(self.user_id).unwrap().token
    }

    /// A token that expired a day ago.
    pub fn expired_token(&self) -> String {
        let issued = Utc::now() - Duration::days(2);
        self.signer.issue_at(self.user_id, issued).unwrap().token
    }

    pub fn headers(&self) -> HeaderMap {
        bearer_headers(&self.token())
    }

    pub fn expired_headers(&self) -> HeaderMap {
        bearer_headers(&self.expired_token())
    }
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    map
}
