use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    SqlErr,
};

use lectio_api_schema::{
    journal_entries, journal_entry_tags, permissions, user_tags, users, versions,
};
use lectio_auth::{Credentials, Identity, IdentityStore, PasswordHasher, rehash_if_present};
use lectio_domain::id::{EntryId, UserId, UserTagId};
use lectio_domain::pagination::Window;

use crate::domain::repository::{JournalRepository, UserRepository};
use crate::domain::types::{
    JournalEntry, NewUser, Permission, TagUsage, User, UserChanges, UserTag, Version,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
    pub hasher: PasswordHasher,
}

impl DbUserRepository {
    async fn load(
        &self,
        rows: Vec<(users::Model, Vec<permissions::Model>)>,
    ) -> Result<Vec<(User, String)>, ApiError> {
        let version_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(user, _)| user.preferred_version_id)
            .collect();
        let versions: HashMap<i32, Version> = if version_ids.is_empty() {
            HashMap::new()
        } else {
            versions::Entity::find()
                .filter(versions::Column::Id.is_in(version_ids))
                .all(&self.db)
                .await
                .context("load preferred versions")?
                .into_iter()
                .map(|v| (v.id, version_from_model(v)))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(user, perms)| {
                let version = user
                    .preferred_version_id
                    .and_then(|id| versions.get(&id).cloned());
                let password = user.password.clone();
                (user_from_model(user, version, perms), password)
            })
            .collect())
    }

    async fn find_one(
        &self,
        filter: impl sea_orm::sea_query::IntoCondition,
    ) -> Result<Option<(User, String)>, ApiError> {
        let rows = users::Entity::find()
            .filter(filter)
            .find_with_related(permissions::Entity)
            .all(&self.db)
            .await
            .context("find user")?;
        Ok(self.load(rows).await?.into_iter().next())
    }
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .find_with_related(permissions::Entity)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(self.load(rows).await?.into_iter().map(|(u, _)| u).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self
            .find_one(users::Column::Id.eq(id.0))
            .await?
            .map(|(u, _)| u))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .find_one(users::Column::Email.eq(email))
            .await?
            .map(|(u, _)| u))
    }

    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let hash = rehash_if_present(&self.hasher, Some(user.password))
            .await?
            .context("signup password hash")?;
        let model = users::ActiveModel {
            email: Set(user.email),
            password: Set(hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            joined_on: Set(Utc::now()),
            preferred_version_id: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| email_conflict(e, "create user"))?;
        Ok(user_from_model(model, None, Vec::new()))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        if let Some(first_name) = changes.first_name {
            am.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            am.last_name = Set(last_name);
        }
        if let Some(email) = changes.email {
            am.email = Set(email);
        }
        if let Some(hash) = rehash_if_present(&self.hasher, changes.password).await? {
            am.password = Set(hash);
        }
        am.update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => ApiError::UserNotFound,
                e => email_conflict(e, "update user"),
            })?;
        self.find_by_id(id).await?.ok_or(ApiError::UserNotFound)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        let models = permissions::Entity::find()
            .order_by_asc(permissions::Column::Id)
            .all(&self.db)
            .await
            .context("list permissions")?;
        Ok(models.into_iter().map(permission_from_model).collect())
    }
}

impl IdentityStore for DbUserRepository {
    async fn find_identity(&self, id: UserId) -> anyhow::Result<Option<Identity>> {
        let user = self
            .find_one(users::Column::Id.eq(id.0))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(user.map(|(u, _)| u.identity()))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>> {
        let user = self
            .find_one(users::Column::Email.eq(email))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(user.map(|(u, password_hash)| Credentials {
            identity: u.identity(),
            password_hash,
        }))
    }
}

fn email_conflict(err: DbErr, ctx: &'static str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::EmailInUse,
        _ => ApiError::Internal(anyhow::Error::new(err).context(ctx)),
    }
}

fn user_from_model(
    model: users::Model,
    version: Option<Version>,
    perms: Vec<permissions::Model>,
) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        joined_on: model.joined_on,
        version,
        permissions: perms.into_iter().map(permission_from_model).collect(),
    }
}

fn version_from_model(model: versions::Model) -> Version {
    Version {
        id: model.id,
        code: model.code,
        title: model.title,
    }
}

fn permission_from_model(model: permissions::Model) -> Permission {
    Permission {
        id: model.id,
        title: model.title,
    }
}

// ── Journal repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbJournalRepository {
    pub db: DatabaseConnection,
}

impl DbJournalRepository {
    async fn with_tags(
        &self,
        models: Vec<journal_entries::Model>,
    ) -> Result<Vec<JournalEntry>, ApiError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let links = journal_entry_tags::Entity::find()
            .filter(journal_entry_tags::Column::JournalEntryId.is_in(ids))
            .find_also_related(user_tags::Entity)
            .all(&self.db)
            .await
            .context("load entry tags")?;

        let mut tags: HashMap<i32, Vec<String>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                tags.entry(link.journal_entry_id).or_default().push(tag.tag);
            }
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let mut entry_tags = tags.remove(&m.id).unwrap_or_default();
                entry_tags.sort();
                entry_from_model(m, entry_tags)
            })
            .collect())
    }
}

impl JournalRepository for DbJournalRepository {
    async fn list(&self, user_id: UserId, window: Window) -> Result<Vec<JournalEntry>, ApiError> {
        let models = journal_entries::Entity::find()
            .filter(journal_entries::Column::UserId.eq(user_id.0))
            .order_by_desc(journal_entries::Column::UpdatedAt)
            .order_by_desc(journal_entries::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(&self.db)
            .await
            .context("list journal entries")?;
        self.with_tags(models).await
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<JournalEntry>, ApiError> {
        let model = journal_entries::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find journal entry")?;
        match model {
            Some(m) => Ok(self.with_tags(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        user_id: UserId,
        title: &str,
        entry: &str,
    ) -> Result<JournalEntry, ApiError> {
        let now = Utc::now();
        let model = journal_entries::ActiveModel {
            user_id: Set(user_id.0),
            title: Set(title.to_owned()),
            entry: Set(entry.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create journal entry")?;
        Ok(entry_from_model(model, Vec::new()))
    }

    async fn update(
        &self,
        id: EntryId,
        title: &str,
        entry: &str,
    ) -> Result<JournalEntry, ApiError> {
        let model = journal_entries::ActiveModel {
            id: Set(id.0),
            title: Set(title.to_owned()),
            entry: Set(entry.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::EntryNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update journal entry")),
        })?;
        self.with_tags(vec![model])
            .await?
            .pop()
            .ok_or(ApiError::EntryNotFound)
    }

    async fn list_tags(&self, user_id: UserId) -> Result<Vec<UserTag>, ApiError> {
        let models = user_tags::Entity::find()
            .filter(user_tags::Column::UserId.eq(user_id.0))
            .order_by_asc(user_tags::Column::Id)
            .all(&self.db)
            .await
            .context("list user tags")?;
        Ok(models
            .into_iter()
            .map(|m| UserTag {
                id: UserTagId(m.id),
                tag: m.tag,
            })
            .collect())
    }

    async fn tag_usage(&self, user_id: UserId) -> Result<Vec<TagUsage>, ApiError> {
        let rows = tag_usage_query(user_id)
            .into_model::<TagUses>()
            .all(&self.db)
            .await
            .context("count tag uses")?;
        Ok(rows
            .into_iter()
            .map(|row| TagUsage {
                tag: row.tag,
                uses: row.uses.max(0) as u64,
            })
            .collect())
    }

    async fn update_times(&self, user_id: UserId) -> Result<Vec<DateTime<Utc>>, ApiError> {
        let times: Vec<DateTime<Utc>> = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::UpdatedAt)
            .filter(journal_entries::Column::UserId.eq(user_id.0))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list entry update times")?;
        Ok(times)
    }
}

#[derive(FromQueryResult)]
struct TagUses {
    tag: String,
    uses: i64,
}

fn uses_count() -> SimpleExpr {
    Expr::col((
        journal_entry_tags::Entity,
        journal_entry_tags::Column::JournalEntryId,
    ))
    .count()
}

/// One row per tag the user has attached at least once, most used first and
/// alphabetical among ties.
fn tag_usage_query(user_id: UserId) -> Select<journal_entry_tags::Entity> {
    journal_entry_tags::Entity::find()
        .select_only()
        .column(user_tags::Column::Tag)
        .column_as(uses_count(), "uses")
        .join(JoinType::InnerJoin, journal_entry_tags::Relation::UserTag.def())
        .filter(user_tags::Column::UserId.eq(user_id.0))
        .group_by(user_tags::Column::Id)
        .group_by(user_tags::Column::Tag)
        .order_by_desc(uses_count())
        .order_by_asc(user_tags::Column::Tag)
}

fn entry_from_model(model: journal_entries::Model, tags: Vec<String>) -> JournalEntry {
    JournalEntry {
        id: EntryId(model.id),
        user_id: UserId(model.user_id),
        title: model.title,
        entry: model.entry,
        tags,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
