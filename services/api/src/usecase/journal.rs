use std::collections::BTreeMap;

use lectio_auth::{Identity, authorize_ownership};
use lectio_domain::id::{EntryId, UserId};
use lectio_domain::pagination::Window;

use crate::domain::repository::JournalRepository;
use crate::domain::types::{JournalEntry, UserTag};
use crate::error::ApiError;

/// How many tags `most_used_tags` reports.
pub const MOST_USED_TAGS: usize = 3;

// ── ListEntries ──────────────────────────────────────────────────────────────

pub struct ListEntriesUseCase<R: JournalRepository> {
    pub repo: R,
}

impl<R: JournalRepository> ListEntriesUseCase<R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        window: Window,
    ) -> Result<Vec<JournalEntry>, ApiError> {
        let window = window.validated().ok_or(ApiError::InvalidPagination)?;
        self.repo.list(user_id, window).await
    }
}

// ── CreateEntry ──────────────────────────────────────────────────────────────

pub struct EntryInput {
    pub title: String,
    pub entry: String,
}

impl EntryInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() || self.entry.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        Ok(())
    }
}

pub struct CreateEntryUseCase<R: JournalRepository> {
    pub repo: R,
}

impl<R: JournalRepository> CreateEntryUseCase<R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        input: EntryInput,
    ) -> Result<JournalEntry, ApiError> {
        input.validate()?;
        self.repo.create(user_id, &input.title, &input.entry).await
    }
}

// ── UpdateEntry ──────────────────────────────────────────────────────────────

pub struct UpdateEntryUseCase<R: JournalRepository> {
    pub repo: R,
}

impl<R: JournalRepository> UpdateEntryUseCase<R> {
    pub async fn execute(
        &self,
        acting: &Identity,
        entry_id: EntryId,
        input: EntryInput,
    ) -> Result<JournalEntry, ApiError> {
        input.validate()?;
        let existing = self
            .repo
            .find_by_id(entry_id)
            .await?
            .ok_or(ApiError::EntryNotFound)?;
        if !authorize_ownership(acting, existing.user_id) {
            tracing::debug!(acting = %acting.id, entry_id = %entry_id, "entry update rejected");
            return Err(ApiError::Forbidden);
        }
        self.repo.update(entry_id, &input.title, &input.entry).await
    }
}

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<R: JournalRepository> {
    pub repo: R,
}

impl<R: JournalRepository> ListTagsUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<UserTag>, ApiError> {
        self.repo.list_tags(user_id).await
    }
}

// ── JournalMeta ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalMeta {
    pub most_used_tags: Vec<String>,
    /// Alphabetical.
    pub all_used_tags: Vec<String>,
    /// `YYYY-MM-DD` of last update → number of entries.
    pub calendar: BTreeMap<String, u64>,
}

pub struct JournalMetaUseCase<R: JournalRepository> {
    pub repo: R,
}

impl<R: JournalRepository> JournalMetaUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<JournalMeta, ApiError> {
        let usage = self.repo.tag_usage(user_id).await?;
        let most_used_tags = usage
            .iter()
            .take(MOST_USED_TAGS)
            .map(|u| u.tag.clone())
            .collect();
        let mut all_used_tags: Vec<String> = usage.into_iter().map(|u| u.tag).collect();
        all_used_tags.sort();

        let mut calendar = BTreeMap::new();
        for updated_at in self.repo.update_times(user_id).await? {
            *calendar
                .entry(updated_at.format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }

        Ok(JournalMeta {
            most_used_tags,
            all_used_tags,
            calendar,
        })
    }
}
