use lectio_auth::{AuthCore, Authenticated, IdentityStore};

use crate::error::ApiError;

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

pub struct AuthenticateUseCase<S: IdentityStore> {
    pub auth: AuthCore<S>,
}

impl<S: IdentityStore> AuthenticateUseCase<S> {
    pub async fn execute(&self, input: AuthenticateInput) -> Result<Authenticated, ApiError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(ApiError::AuthenticationFailed);
        }
        Ok(self
            .auth
            .authenticate(input.email.trim(), input.password)
            .await?)
    }
}
