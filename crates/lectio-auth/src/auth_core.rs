use anyhow::Context as _;
use lectio_domain::id::UserId;

use crate::error::{AuthError, TokenError};
use crate::identity::{Identity, IdentityStore};
use crate::password::PasswordHasher;
use crate::token::{IssuedToken, TokenSigner};

/// Successful `authenticate` result.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: IssuedToken,
    pub user: Identity,
}

/// Password hashing, token issuance/validation and the ownership check,
/// bound to one identity store.
#[derive(Clone)]
pub struct AuthCore<S> {
    store: S,
    signer: TokenSigner,
    hasher: PasswordHasher,
}

impl<S: IdentityStore> AuthCore<S> {
    pub fn new(store: S, signer: TokenSigner, hasher: PasswordHasher) -> Self {
        Self {
            store,
            signer,
            hasher,
        }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub async fn hash_password(&self, plaintext: String) -> Result<String, AuthError> {
        self.hasher.hash(plaintext).await
    }

    pub async fn verify_password(
        &self,
        plaintext: String,
        hash: String,
    ) -> Result<bool, AuthError> {
        self.hasher.verify(plaintext, hash).await
    }

    pub fn issue_token(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.signer.issue(user_id)
    }

    /// Verify `token` and re-resolve its subject.
    ///
    /// Every rejection reason collapses into `AuthenticationFailed`. Storage
    /// errors stay `Internal`.
    pub async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.signer.verify(token).map_err(reject)?;
        let user_id = claims.user_id().map_err(reject)?;

        let identity = self
            .store
            .find_identity(user_id)
            .await
            .context("failed to resolve token subject")?;

        identity.ok_or_else(|| {
            tracing::debug!(user_id = %user_id, "token subject no longer exists");
            AuthError::AuthenticationFailed
        })
    }

    /// Credential lookup, password verification and token issuance.
    pub async fn authenticate(
        &self,
        email: &str,
        password: String,
    ) -> Result<Authenticated, AuthError> {
        let credentials = self
            .store
            .find_credentials(email)
            .await
            .context("failed to look up credentials")?;

        let Some(credentials) = credentials else {
            // Unknown email pays for a verification too.
            self.hasher.verify_dummy(password).await?;
            tracing::debug!("authentication rejected: unknown email");
            return Err(AuthError::AuthenticationFailed);
        };

        if !self
            .hasher
            .verify(password, credentials.password_hash)
            .await?
        {
            tracing::debug!(
                user_id = %credentials.identity.id,
                "authentication rejected: wrong password"
            );
            return Err(AuthError::AuthenticationFailed);
        }

        let token = self.signer.issue(credentials.identity.id)?;
        tracing::info!(user_id = %credentials.identity.id, "token issued");
        Ok(Authenticated {
            token,
            user: credentials.identity,
        })
    }
}

/// Strict self-only ownership. There is no administrative override.
pub fn authorize_ownership(acting: &Identity, target_owner_id: UserId) -> bool {
    acting.id == target_owner_id
}

fn reject(reason: TokenError) -> AuthError {
    tracing::debug!(reason = %reason, "token rejected");
    AuthError::AuthenticationFailed
}
