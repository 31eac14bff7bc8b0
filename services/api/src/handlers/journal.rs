use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lectio_domain::id::{EntryId, UserTagId};
use lectio_domain::pagination::Window;

use crate::domain::types::JournalEntry;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::journal::{
    CreateEntryUseCase, EntryInput, JournalMetaUseCase, ListEntriesUseCase, ListTagsUseCase,
    UpdateEntryUseCase,
};

#[derive(Serialize)]
pub struct EntryResponse {
    pub id: EntryId,
    pub title: String,
    pub entry: String,
    pub tags: Vec<String>,
    #[serde(serialize_with = "lectio_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lectio_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<JournalEntry> for EntryResponse {
    fn from(e: JournalEntry) -> Self {
        Self {
            id: e.id,
            title: e.title,
            entry: e.entry,
            tags: e.tags,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct EntryRequest {
    pub title: String,
    pub entry: String,
}

impl From<EntryRequest> for EntryInput {
    fn from(r: EntryRequest) -> Self {
        Self {
            title: r.title,
            entry: r.entry,
        }
    }
}

// ── GET /entries ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EntriesResponse {
    pub start_index: u64,
    pub count: usize,
    pub journal_entries: Vec<EntryResponse>,
}

pub async fn get_entries(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(window): Query<Window>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let usecase = ListEntriesUseCase {
        repo: state.journal_repo(),
    };
    let entries = usecase.execute(caller.id, window).await?;
    Ok(Json(EntriesResponse {
        start_index: window.offset,
        count: entries.len(),
        journal_entries: entries.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /entries/meta ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct JournalMetaResponse {
    pub most_used_tags: Vec<String>,
    pub all_used_tags: Vec<String>,
    pub calendar_journal_entries: BTreeMap<String, u64>,
}

pub async fn get_journal_meta(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<JournalMetaResponse>, ApiError> {
    let usecase = JournalMetaUseCase {
        repo: state.journal_repo(),
    };
    let meta = usecase.execute(caller.id).await?;
    Ok(Json(JournalMetaResponse {
        most_used_tags: meta.most_used_tags,
        all_used_tags: meta.all_used_tags,
        calendar_journal_entries: meta.calendar,
    }))
}

// ── POST /entries ────────────────────────────────────────────────────────────

pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<EntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let usecase = CreateEntryUseCase {
        repo: state.journal_repo(),
    };
    let entry = usecase.execute(caller.id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

// ── PATCH /entries/{id} ──────────────────────────────────────────────────────

pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<EntryId>,
    Json(body): Json<EntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let usecase = UpdateEntryUseCase {
        repo: state.journal_repo(),
    };
    let entry = usecase.execute(&caller, id, body.into()).await?;
    Ok(Json(entry.into()))
}

// ── GET /tags ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TagResponse {
    pub id: UserTagId,
    pub tag: String,
}

pub async fn get_tags(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let usecase = ListTagsUseCase {
        repo: state.journal_repo(),
    };
    let tags = usecase.execute(caller.id).await?;
    Ok(Json(
        tags.into_iter()
            .map(|t| TagResponse { id: t.id, tag: t.tag })
            .collect(),
    ))
}
