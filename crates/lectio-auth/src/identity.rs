//! The identity port AuthCore re-resolves token subjects against.

#![allow(async_fn_in_trait)]

use lectio_domain::id::UserId;
use serde::Serialize;

/// A user as seen across the system boundary. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_version_id: Option<i32>,
    pub permissions: Vec<String>,
}

/// An identity together with its stored password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identity: Identity,
    pub password_hash: String,
}

pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, id: UserId) -> anyhow::Result<Option<Identity>>;

    /// Email lookup is exact; callers normalise before calling.
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>>;
}
