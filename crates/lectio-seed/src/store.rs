//! Storage port the seeder writes through.

#![allow(async_fn_in_trait)]

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::registry::Table;

/// Identity of a persisted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowId {
    Int(i32),
    Uuid(Uuid),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => id.fmt(f),
            Self::Uuid(id) => id.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i32),
    BigInt(i64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl From<RowId> for FieldValue {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Int(id) => Self::Integer(id),
            RowId::Uuid(id) => Self::Uuid(id),
        }
    }
}

/// Ordered column/value pairs for one insert. Absent columns take the
/// table default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: FieldValue) {
        let column = column.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: FieldValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub trait SeedStore {
    type Tx: SeedTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One open transaction. Dropping it without `commit` discards its writes.
pub trait SeedTx {
    /// Insert `row` and return the id the store assigned (serial) or kept (uuid).
    async fn insert(&mut self, table: &Table, row: Row) -> Result<RowId, StoreError>;

    /// Id of the first row whose columns equal every `(column, value)` pair.
    async fn find_one(
        &mut self,
        table: &Table,
        predicate: &[(&str, FieldValue)],
    ) -> Result<Option<RowId>, StoreError>;

    /// Insert one join row into `through`.
    async fn relate(
        &mut self,
        through: &str,
        from_column: &str,
        from_id: RowId,
        to_column: &str,
        to_id: RowId,
    ) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}
