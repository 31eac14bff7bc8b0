use std::fmt::Display;

use anyhow::anyhow;
use sea_orm::sea_query::{Alias, Expr, Query, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, QueryResult, SqlErr,
    TransactionTrait, Value,
};

use crate::error::StoreError;
use crate::registry::{IdKind, Table};
use crate::store::{FieldValue, Row, RowId, SeedStore, SeedTx};

/// PostgreSQL-backed seed store. Statements are built dynamically from the
/// registry's table and column names.
#[derive(Clone)]
pub struct DbSeedStore {
    db: DatabaseConnection,
}

impl DbSeedStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SeedStore for DbSeedStore {
    type Tx = DbSeedTx;

    async fn begin(&self) -> Result<DbSeedTx, StoreError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| classify(e, "failed to begin seed transaction"))?;
        Ok(DbSeedTx { txn })
    }
}

pub struct DbSeedTx {
    txn: DatabaseTransaction,
}

impl SeedTx for DbSeedTx {
    async fn insert(&mut self, table: &Table, row: Row) -> Result<RowId, StoreError> {
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(table.name))
            .returning_col(Alias::new(table.id_column));
        if row.is_empty() {
            stmt.or_default_values();
        } else {
            stmt.columns(row.fields().map(|(column, _)| Alias::new(column)));
            stmt.values(row.fields().map(|(_, value)| SimpleExpr::Value(to_value(value))))
                .map_err(|e| anyhow!("failed to build insert into {}: {e}", table.name))?;
        }

        let backend = self.txn.get_database_backend();
        let returned = self
            .txn
            .query_one(backend.build(&stmt))
            .await
            .map_err(|e| classify(e, format!("failed to insert into {}", table.name)))?
            .ok_or_else(|| anyhow!("insert into {} returned no id", table.name))?;
        read_id(&returned, table)
    }

    async fn find_one(
        &mut self,
        table: &Table,
        predicate: &[(&str, FieldValue)],
    ) -> Result<Option<RowId>, StoreError> {
        let mut stmt = Query::select();
        stmt.column(Alias::new(table.id_column))
            .from(Alias::new(table.name))
            .limit(1);
        for (column, value) in predicate {
            stmt.and_where(Expr::col(Alias::new(*column)).eq(to_value(value)));
        }

        let backend = self.txn.get_database_backend();
        let found = self
            .txn
            .query_one(backend.build(&stmt))
            .await
            .map_err(|e| classify(e, format!("failed to query {}", table.name)))?;
        found.map(|row| read_id(&row, table)).transpose()
    }

    async fn relate(
        &mut self,
        through: &str,
        from_column: &str,
        from_id: RowId,
        to_column: &str,
        to_id: RowId,
    ) -> Result<(), StoreError> {
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(through))
            .columns([Alias::new(from_column), Alias::new(to_column)])
            .values([
                SimpleExpr::Value(to_value(&from_id.into())),
                SimpleExpr::Value(to_value(&to_id.into())),
            ])
            .map_err(|e| anyhow!("failed to build insert into {through}: {e}"))?;

        let backend = self.txn.get_database_backend();
        self.txn
            .execute(backend.build(&stmt))
            .await
            .map_err(|e| classify(e, format!("failed to relate through {through}")))?;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.txn
            .commit()
            .await
            .map_err(|e| classify(e, "failed to commit seed transaction"))
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.txn
            .rollback()
            .await
            .map_err(|e| classify(e, "failed to roll back seed transaction"))
    }
}

fn read_id(row: &QueryResult, table: &Table) -> Result<RowId, StoreError> {
    let id = match table.id_kind {
        IdKind::Serial => row.try_get::<i32>("", table.id_column).map(RowId::Int),
        IdKind::Uuid => row.try_get::<uuid::Uuid>("", table.id_column).map(RowId::Uuid),
    };
    id.map_err(|e| classify(e, format!("failed to read {}.{}", table.name, table.id_column)))
}

fn to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(n) => (*n).into(),
        FieldValue::BigInt(n) => (*n).into(),
        FieldValue::Text(s) => s.clone().into(),
        FieldValue::Boolean(b) => (*b).into(),
        FieldValue::Date(d) => (*d).into(),
        FieldValue::Timestamp(ts) => (*ts).into(),
        FieldValue::Uuid(id) => (*id).into(),
        FieldValue::Json(json) => json.clone().into(),
    }
}

/// Constraint violations keep their own variants so callers can tell a
/// duplicate from a broken reference.
fn classify<C>(err: DbErr, context: C) -> StoreError
where
    C: Display + Send + Sync + 'static,
{
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            StoreError::ForeignKeyViolation(detail)
        }
        _ => StoreError::Backend(anyhow::Error::new(err).context(context)),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::{PostgresQueryBuilder, QueryStatementWriter};

    use super::*;

    #[test]
    fn non_constraint_errors_become_backend_errors() {
        let err = classify(DbErr::Custom("connection reset".into()), "failed to insert into tags");
        match err {
            StoreError::Backend(e) => {
                assert_eq!(e.to_string(), "failed to insert into tags");
                assert!(format!("{e:#}").contains("connection reset"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_build_insert_with_returning_id() {
        let row = Row::new()
            .with("title", FieldValue::Text("Image".into()))
            .with("icon", FieldValue::Text("image-icon".into()));
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new("resource_types"))
            .returning_col(Alias::new("id"))
            .columns(row.fields().map(|(c, _)| Alias::new(c)))
            .values(row.fields().map(|(_, v)| SimpleExpr::Value(to_value(v))))
            .unwrap();

        let sql = stmt.to_string(PostgresQueryBuilder);
        assert_eq!(
            sql,
            concat!(
                r#"INSERT INTO "resource_types" ("title", "icon") "#,
                r#"VALUES ('Image', 'image-icon') RETURNING "id""#,
            )
        );
    }
}
