use anyhow::anyhow;
use serde_json::Value;

use crate::error::{SeedError, StoreError, ValidationError};
use crate::graph::{self, NodeIndex, ResolvedGraph};
use crate::registry::{Registry, RelationKind};
use crate::store::{FieldValue, RowId, SeedStore, SeedTx};

/// Result of a committed seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Ids of the top-level nodes, in document order.
    pub roots: Vec<RowId>,
    /// Entity rows inserted.
    pub inserted: usize,
    /// Join rows inserted.
    pub related: usize,
}

/// Inserts nested, cross-referencing entity graphs in one transaction.
///
/// The local-id table lives inside a single [`ResolvedGraph`] and is dropped
/// with it, so concurrent seeds never see each other's symbols.
pub struct GraphSeeder<S> {
    registry: Registry,
    store: S,
}

impl<S: SeedStore> GraphSeeder<S> {
    pub fn new(registry: Registry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Dry pass: parse, bind references and plan insertion order. No I/O.
    pub fn resolve(
        &self,
        model: &str,
        document: &Value,
    ) -> Result<ResolvedGraph<'_>, ValidationError> {
        graph::resolve(&self.registry, model, document)
    }

    /// Insert a resolved graph. Any failure rolls back every write.
    pub async fn insert(&self, graph: &ResolvedGraph<'_>) -> Result<SeedOutcome, SeedError> {
        let mut tx = self.store.begin().await?;

        match write(&mut tx, graph).await {
            Ok(outcome) => {
                tx.commit().await?;
                tracing::info!(
                    model = graph.model().name,
                    roots = outcome.roots.len(),
                    inserted = outcome.inserted,
                    related = outcome.related,
                    "seed committed"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(model = graph.model().name, error = %e, "seed failed, rolling back");
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "rollback failed");
                }
                Err(e.into())
            }
        }
    }

    /// Resolve then insert.
    pub async fn seed(&self, model: &str, document: &Value) -> Result<SeedOutcome, SeedError> {
        let graph = self.resolve(model, document)?;
        self.insert(&graph).await
    }
}

async fn write<T: SeedTx>(
    tx: &mut T,
    graph: &ResolvedGraph<'_>,
) -> Result<SeedOutcome, StoreError> {
    let node_count = graph.nodes().len();

    // (column, node whose id fills it) per node.
    let mut foreign_keys: Vec<Vec<(&'static str, NodeIndex)>> = vec![Vec::new(); node_count];
    for edge in graph.edges() {
        match edge.relation.kind {
            RelationKind::BelongsToOne { foreign_key } => {
                foreign_keys[edge.owner].push((foreign_key, edge.related));
            }
            RelationKind::HasMany { foreign_key } => {
                foreign_keys[edge.related].push((foreign_key, edge.owner));
            }
            RelationKind::ManyToMany { .. } => {}
        }
    }

    let mut ids: Vec<Option<RowId>> = vec![None; node_count];
    for &index in graph.insertion_order() {
        let node = graph.node(index);
        let table = &node.model.table;

        let mut row = node.row.clone();
        if let Some(id) = node.preset_id {
            row.set(table.id_column, FieldValue::Uuid(id));
        }
        for &(column, source) in &foreign_keys[index] {
            row.set(column, id_of(&ids, source)?.into());
        }

        let id = tx.insert(table, row).await?;
        tracing::debug!(table = table.name, id = %id, path = %node.path, "row inserted");
        ids[index] = Some(id);
    }

    let mut related = 0;
    for edge in graph.join_edges() {
        let RelationKind::ManyToMany {
            through,
            from_column,
            to_column,
        } = edge.relation.kind
        else {
            continue;
        };
        tx.relate(
            through,
            from_column,
            id_of(&ids, edge.owner)?,
            to_column,
            id_of(&ids, edge.related)?,
        )
        .await?;
        related += 1;
    }

    let roots = graph
        .roots()
        .iter()
        .map(|&i| id_of(&ids, i))
        .collect::<Result<_, _>>()?;

    Ok(SeedOutcome {
        roots,
        inserted: node_count,
        related,
    })
}

fn id_of(ids: &[Option<RowId>], index: NodeIndex) -> Result<RowId, StoreError> {
    ids[index]
        .ok_or_else(|| StoreError::Backend(anyhow!("node {index} referenced before insertion")))
}
