use lectio_auth::{Identity, authorize_ownership};
use lectio_domain::id::UserId;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    NewUser, Permission, User, UserChanges, validate_email, validate_password,
};
use crate::error::ApiError;

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct SignupUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, ApiError> {
        let email = input.email.trim().to_owned();
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        if !validate_email(&email) {
            return Err(ApiError::InvalidEmail);
        }
        if !validate_password(&input.password) {
            return Err(ApiError::PasswordTooShort);
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailInUse);
        }

        let user = self
            .repo
            .create(NewUser {
                email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.repo.list().await
    }
}

// ── ListPermissions ──────────────────────────────────────────────────────────

pub struct ListPermissionsUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListPermissionsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Permission>, ApiError> {
        self.repo.list_permissions().await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, acting: &Identity, user_id: UserId) -> Result<User, ApiError> {
        if !authorize_ownership(acting, user_id) {
            return Err(ApiError::Forbidden);
        }
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    /// Ownership is checked before anything is read or written.
    pub async fn execute(
        &self,
        acting: &Identity,
        user_id: UserId,
        mut changes: UserChanges,
    ) -> Result<User, ApiError> {
        if !authorize_ownership(acting, user_id) {
            tracing::debug!(acting = %acting.id, target = %user_id, "user update rejected");
            return Err(ApiError::Forbidden);
        }
        if changes.is_empty() {
            return Err(ApiError::MissingData);
        }
        if changes
            .first_name
            .iter()
            .chain(changes.last_name.iter())
            .any(|name| name.trim().is_empty())
        {
            return Err(ApiError::MissingData);
        }
        if let Some(ref password) = changes.password {
            if !validate_password(password) {
                return Err(ApiError::PasswordTooShort);
            }
        }
        if let Some(email) = changes.email.take() {
            let email = email.trim().to_owned();
            if !validate_email(&email) {
                return Err(ApiError::InvalidEmail);
            }
            if let Some(existing) = self.repo.find_by_email(&email).await? {
                if existing.id != user_id {
                    return Err(ApiError::EmailInUse);
                }
            }
            changes.email = Some(email);
        }

        self.repo.update(user_id, changes).await
    }
}
