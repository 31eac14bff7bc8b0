use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use lectio_auth::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{AuthenticateInput, AuthenticateUseCase};

// ── POST /authenticate ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthenticateResponse {
    pub id_token: String,
    pub expires_at: i64,
    pub user: Identity,
}

pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>, ApiError> {
    let usecase = AuthenticateUseCase {
        auth: state.auth.clone(),
    };
    let authenticated = usecase
        .execute(AuthenticateInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(AuthenticateResponse {
        id_token: authenticated.token.token,
        expires_at: authenticated.token.expires_at,
        user: authenticated.user,
    }))
}
