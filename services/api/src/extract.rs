use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lectio_auth::{BearerToken, Identity};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller behind a valid bearer token, re-resolved against the user table.
/// Missing, malformed, expired and orphaned tokens all reject with
/// `AuthenticationFailed`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = BearerToken::from_parts(parts);
        let auth = state.auth.clone();
        async move {
            let Some(BearerToken(token)) = token else {
                tracing::debug!("request without bearer token");
                return Err(ApiError::AuthenticationFailed);
            };
            let identity = auth.validate_token(&token).await?;
            Ok(Self(identity))
        }
    }
}
