#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use lectio_domain::id::{EntryId, UserId};
use lectio_domain::pagination::Window;

use crate::domain::types::{
    JournalEntry, NewUser, Permission, TagUsage, User, UserChanges, UserTag,
};
use crate::error::ApiError;

/// Repository for user accounts. Implementations hash any supplied password
/// before it is persisted.
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    /// Returns `EmailInUse` if the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, ApiError>;
    /// Returns `EmailInUse` if a new email is already taken.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, ApiError>;
    async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError>;
}

/// Repository for journal entries and the tags users attach to them.
pub trait JournalRepository: Send + Sync {
    /// Newest update first.
    async fn list(&self, user_id: UserId, window: Window) -> Result<Vec<JournalEntry>, ApiError>;
    async fn find_by_id(&self, id: EntryId) -> Result<Option<JournalEntry>, ApiError>;
    async fn create(
        &self,
        user_id: UserId,
        title: &str,
        entry: &str,
    ) -> Result<JournalEntry, ApiError>;
    async fn update(&self, id: EntryId, title: &str, entry: &str) -> Result<JournalEntry, ApiError>;
    async fn list_tags(&self, user_id: UserId) -> Result<Vec<UserTag>, ApiError>;
    /// Most used first.
    async fn tag_usage(&self, user_id: UserId) -> Result<Vec<TagUsage>, ApiError>;
    async fn update_times(&self, user_id: UserId) -> Result<Vec<DateTime<Utc>>, ApiError>;
}
