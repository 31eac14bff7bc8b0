//! In-process store with unique and foreign-key enforcement.
//!
//! Transactions are serialized: `begin` waits for the writer gate, then works
//! on a private copy of the committed tables and swaps it in on commit. An
//! aborted seed leaves the shared state untouched, and a commit never
//! overwrites another transaction's rows.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::StoreError;
use crate::registry::{IdKind, Registry, RelationKind, Table};
use crate::store::{FieldValue, Row, RowId, SeedStore, SeedTx};

#[derive(Debug, Clone, Default)]
struct MemTable {
    rows: Vec<Row>,
    last_serial: i32,
}

type Tables = BTreeMap<String, MemTable>;

#[derive(Debug, Clone)]
struct Unique {
    table: String,
    columns: Vec<String>,
}

#[derive(Debug, Clone)]
struct ForeignKey {
    table: String,
    column: String,
    references: String,
    references_column: String,
}

#[derive(Debug, Clone, Default)]
struct Constraints {
    unique: Vec<Unique>,
    foreign: Vec<ForeignKey>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    writer: Arc<AsyncMutex<()>>,
    constraints: Arc<Constraints>,
    failing_tables: Arc<Mutex<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the foreign keys implied by every relation in `registry`
    /// and a composite unique key on every join table.
    pub fn for_registry(registry: &Registry) -> Self {
        let mut store = Self::new();
        for model in registry.models() {
            for relation in &model.relations {
                let Some(target) = registry.get(relation.target) else {
                    continue;
                };
                store = match relation.kind {
                    RelationKind::BelongsToOne { foreign_key } => store.foreign_key(
                        model.table.name,
                        foreign_key,
                        target.table.name,
                        target.table.id_column,
                    ),
                    RelationKind::HasMany { foreign_key } => store.foreign_key(
                        target.table.name,
                        foreign_key,
                        model.table.name,
                        model.table.id_column,
                    ),
                    RelationKind::ManyToMany {
                        through,
                        from_column,
                        to_column,
                    } => store
                        .foreign_key(through, from_column, model.table.name, model.table.id_column)
                        .foreign_key(through, to_column, target.table.name, target.table.id_column)
                        .unique(through, &[from_column, to_column]),
                };
            }
        }
        store
    }

    pub fn unique(mut self, table: &str, columns: &[&str]) -> Self {
        Arc::make_mut(&mut self.constraints).unique.push(Unique {
            table: table.to_owned(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        });
        self
    }

    pub fn foreign_key(
        mut self,
        table: &str,
        column: &str,
        references: &str,
        references_column: &str,
    ) -> Self {
        Arc::make_mut(&mut self.constraints).foreign.push(ForeignKey {
            table: table.to_owned(),
            column: column.to_owned(),
            references: references.to_owned(),
            references_column: references_column.to_owned(),
        });
        self
    }

    /// Make every later insert or relate into `table` fail with a backend error.
    pub fn fail_writes_to(&self, table: &str) {
        lock(&self.failing_tables).insert(table.to_owned());
    }

    pub fn count(&self, table: &str) -> usize {
        lock(&self.tables).get(table).map_or(0, |t| t.rows.len())
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        lock(&self.tables)
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }
}

impl SeedStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let gate = Arc::clone(&self.writer).lock_owned().await;
        Ok(MemoryTx {
            store: self.clone(),
            work: lock(&self.tables).clone(),
            _gate: gate,
        })
    }
}

/// Holds the writer gate until it is committed or rolled back.
pub struct MemoryTx {
    store: MemoryStore,
    work: Tables,
    _gate: OwnedMutexGuard<()>,
}

impl MemoryTx {
    fn check_writable(&self, table: &str) -> Result<(), StoreError> {
        if lock(&self.store.failing_tables).contains(table) {
            return Err(StoreError::Backend(anyhow!(
                "injected failure writing to {table}"
            )));
        }
        Ok(())
    }

    fn check_constraints(&self, table: &str, row: &Row) -> Result<(), StoreError> {
        let constraints = &self.store.constraints;

        for fk in constraints.foreign.iter().filter(|fk| fk.table == table) {
            let Some(value) = row.get(&fk.column) else {
                continue;
            };
            let exists = self.work.get(&fk.references).is_some_and(|t| {
                t.rows
                    .iter()
                    .any(|r| r.get(&fk.references_column) == Some(value))
            });
            if !exists {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "{table}.{} -> {}.{}",
                    fk.column, fk.references, fk.references_column
                )));
            }
        }

        for unique in constraints.unique.iter().filter(|u| u.table == table) {
            let key: Vec<_> = unique.columns.iter().map(|c| row.get(c)).collect();
            if key.iter().any(Option::is_none) {
                continue;
            }
            let clash = self.work.get(table).is_some_and(|t| {
                t.rows
                    .iter()
                    .any(|r| unique.columns.iter().map(|c| r.get(c)).eq(key.iter().copied()))
            });
            if clash {
                return Err(StoreError::UniqueViolation(format!(
                    "{table}({})",
                    unique.columns.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl SeedTx for MemoryTx {
    async fn insert(&mut self, table: &Table, mut row: Row) -> Result<RowId, StoreError> {
        self.check_writable(table.name)?;

        let id = match table.id_kind {
            IdKind::Serial => {
                let next = self.work.get(table.name).map_or(0, |t| t.last_serial) + 1;
                RowId::Int(next)
            }
            IdKind::Uuid => match row.get(table.id_column) {
                Some(FieldValue::Uuid(id)) => RowId::Uuid(*id),
                _ => {
                    return Err(StoreError::Backend(anyhow!(
                        "{}.{} requires a uuid",
                        table.name,
                        table.id_column
                    )));
                }
            },
        };
        row.set(table.id_column, id.into());

        // Primary key first, then declared constraints.
        let duplicate_id = self.work.get(table.name).is_some_and(|t| {
            t.rows
                .iter()
                .any(|r| r.get(table.id_column) == row.get(table.id_column))
        });
        if duplicate_id {
            return Err(StoreError::UniqueViolation(format!("{}_pkey", table.name)));
        }
        self.check_constraints(table.name, &row)?;

        let entry = self.work.entry(table.name.to_owned()).or_default();
        if let RowId::Int(n) = id {
            entry.last_serial = n;
        }
        entry.rows.push(row);
        Ok(id)
    }

    async fn find_one(
        &mut self,
        table: &Table,
        predicate: &[(&str, FieldValue)],
    ) -> Result<Option<RowId>, StoreError> {
        let Some(rows) = self.work.get(table.name) else {
            return Ok(None);
        };
        let found = rows
            .rows
            .iter()
            .find(|r| predicate.iter().all(|(c, v)| r.get(c) == Some(v)))
            .and_then(|r| match r.get(table.id_column) {
                Some(FieldValue::Integer(id)) => Some(RowId::Int(*id)),
                Some(FieldValue::Uuid(id)) => Some(RowId::Uuid(*id)),
                _ => None,
            });
        Ok(found)
    }

    async fn relate(
        &mut self,
        through: &str,
        from_column: &str,
        from_id: RowId,
        to_column: &str,
        to_id: RowId,
    ) -> Result<(), StoreError> {
        self.check_writable(through)?;
        let row = Row::new()
            .with(from_column, from_id.into())
            .with(to_column, to_id.into());
        self.check_constraints(through, &row)?;
        self.work.entry(through.to_owned()).or_default().rows.push(row);
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        *lock(&self.store.tables) = self.work;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
