use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lectio_domain::id::UserId;

use crate::domain::types::{Permission, User, UserChanges, Version};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::user::{
    GetUserUseCase, ListPermissionsUseCase, ListUsersUseCase, SignupInput, SignupUseCase,
    UpdateUserUseCase,
};

#[derive(Serialize)]
pub struct VersionResponse {
    pub id: i32,
    pub code: String,
    pub title: Option<String>,
}

impl From<Version> for VersionResponse {
    fn from(v: Version) -> Self {
        Self {
            id: v.id,
            code: v.code,
            title: v.title,
        }
    }
}

#[derive(Serialize)]
pub struct PermissionResponse {
    pub id: i32,
    pub title: String,
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            id: p.id,
            title: p.title,
        }
    }
}

/// Public user shape. There is no password field to leak.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "lectio_core::serde::to_rfc3339_ms")]
    pub joined_on: DateTime<Utc>,
    pub version: Option<VersionResponse>,
    pub permissions: Vec<PermissionResponse>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            joined_on: u.joined_on,
            version: u.version.map(Into::into),
            permissions: u.permissions.into_iter().map(Into::into).collect(),
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn get_users(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── POST /users/signup ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = SignupUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(SignupInput {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/permissions ───────────────────────────────────────────────────

pub async fn get_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
    let usecase = ListPermissionsUseCase {
        repo: state.user_repo(),
    };
    let permissions = usecase.execute().await?;
    Ok(Json(permissions.into_iter().map(Into::into).collect()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&caller, id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{id}/name ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNameRequest {
    pub first_name: String,
    pub last_name: String,
}

pub async fn update_name(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateNameRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = UserChanges {
        first_name: Some(body.first_name),
        last_name: Some(body.last_name),
        ..Default::default()
    };
    update(state, caller, id, changes).await
}

// ── PATCH /users/{id}/email ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

pub async fn update_email(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateEmailRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = UserChanges {
        email: Some(body.email),
        ..Default::default()
    };
    update(state, caller, id, changes).await
}

// ── PATCH /users/{id}/password ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = UserChanges {
        password: Some(body.password),
        ..Default::default()
    };
    update(state, caller, id, changes).await
}

async fn update(
    state: AppState,
    caller: lectio_auth::Identity,
    id: UserId,
    changes: UserChanges,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&caller, id, changes).await?;
    Ok(Json(user.into()))
}
