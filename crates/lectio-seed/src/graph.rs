//! Two-pass resolution of a seed document into an arena of nodes.
//!
//! Pass one walks the document depth-first, assigning arena indices in
//! document order and registering every local id. References are queued by
//! symbol. Pass two binds each queued reference to its declared node, so a
//! reference may appear before or after the node it names.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::plan;
use crate::registry::{Column, ColumnType, IdKind, ModelDef, Registry, Relation, RelationKind};
use crate::store::{FieldValue, Row};

const LOCAL_ID_KEYS: [&str; 2] = ["localId", "#id"];
const REFERENCE_KEYS: [&str; 2] = ["reference", "#ref"];

pub type NodeIndex = usize;

/// One row to be inserted.
#[derive(Debug, Clone)]
pub struct Node<'r> {
    pub model: &'r ModelDef,
    /// JSON-path-like location in the source document, for diagnostics.
    pub path: String,
    pub local_id: Option<String>,
    /// Declared column values. Foreign keys are filled in at insert time.
    pub row: Row,
    /// Pre-assigned id for UUID-keyed tables.
    pub preset_id: Option<Uuid>,
}

/// A resolved relation between two arena nodes.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'r> {
    pub relation: &'r Relation,
    pub owner: NodeIndex,
    pub related: NodeIndex,
    /// `related` was named by a reference rather than declared inline.
    pub shared: bool,
}

#[derive(Debug)]
pub struct ResolvedGraph<'r> {
    model: &'r ModelDef,
    nodes: Vec<Node<'r>>,
    edges: Vec<Edge<'r>>,
    roots: Vec<NodeIndex>,
    symbols: HashMap<String, NodeIndex>,
    order: Vec<NodeIndex>,
}

impl<'r> ResolvedGraph<'r> {
    pub fn model(&self) -> &'r ModelDef {
        self.model
    }

    pub fn nodes(&self) -> &[Node<'r>] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &Node<'r> {
        &self.nodes[index]
    }

    pub fn edges(&self) -> &[Edge<'r>] {
        &self.edges
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn symbol(&self, name: &str) -> Option<NodeIndex> {
        self.symbols.get(name).copied()
    }

    /// Node indices in an order where every dependency precedes its dependents.
    pub fn insertion_order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Many-to-many edges in document order.
    pub fn join_edges(&self) -> impl Iterator<Item = &Edge<'r>> {
        self.edges
            .iter()
            .filter(|e| matches!(e.relation.kind, RelationKind::ManyToMany { .. }))
    }
}

/// Resolve `document` (one node or an array of nodes of `model`).
pub fn resolve<'r>(
    registry: &'r Registry,
    model: &str,
    document: &Value,
) -> Result<ResolvedGraph<'r>, ValidationError> {
    let model = registry.require(model)?;
    let mut builder = Builder {
        registry,
        nodes: Vec::new(),
        pending: Vec::new(),
        symbols: HashMap::new(),
    };

    let mut roots = Vec::new();
    match document {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                roots.push(builder.declare_root(model, item, format!("$[{i}]"))?);
            }
        }
        other => roots.push(builder.declare_root(model, other, "$".to_owned())?),
    }

    let Builder {
        nodes,
        pending,
        symbols,
        ..
    } = builder;

    let mut edges = Vec::with_capacity(pending.len());
    for edge in pending {
        let (related, shared) = match edge.target {
            Target::Node(index) => (index, false),
            Target::Symbol { symbol, path } => {
                let index = *symbols
                    .get(&symbol)
                    .ok_or(ValidationError::UnresolvedReference {
                        symbol: symbol.clone(),
                    })?;
                let found = nodes[index].model.name;
                if found != edge.relation.target {
                    return Err(ValidationError::ReferenceModelMismatch {
                        path,
                        symbol,
                        expected: edge.relation.target,
                        found,
                    });
                }
                (index, true)
            }
        };
        edges.push(Edge {
            relation: edge.relation,
            owner: edge.owner,
            related,
            shared,
        });
    }

    let order = plan::insertion_order(&nodes, &edges)?;

    tracing::debug!(
        model = model.name,
        nodes = nodes.len(),
        edges = edges.len(),
        symbols = symbols.len(),
        "seed graph resolved"
    );

    Ok(ResolvedGraph {
        model,
        nodes,
        edges,
        roots,
        symbols,
        order,
    })
}

enum Target {
    Node(NodeIndex),
    Symbol { symbol: String, path: String },
}

struct PendingEdge<'r> {
    relation: &'r Relation,
    owner: NodeIndex,
    target: Target,
}

struct Builder<'r> {
    registry: &'r Registry,
    nodes: Vec<Node<'r>>,
    pending: Vec<PendingEdge<'r>>,
    symbols: HashMap<String, NodeIndex>,
}

impl<'r> Builder<'r> {
    fn declare_root(
        &mut self,
        model: &'r ModelDef,
        value: &Value,
        path: String,
    ) -> Result<NodeIndex, ValidationError> {
        let object = as_object(value, &path)?;
        if reference_of(object, &path)?.is_some() {
            return Err(ValidationError::ReferenceAtRoot { path });
        }
        self.declare(model, object, path)
    }

    fn declare(
        &mut self,
        model: &'r ModelDef,
        object: &Map<String, Value>,
        path: String,
    ) -> Result<NodeIndex, ValidationError> {
        let local_id = local_id_of(object, &path)?;
        let index = self.nodes.len();
        if let Some(symbol) = &local_id {
            if self.symbols.insert(symbol.clone(), index).is_some() {
                return Err(ValidationError::DuplicateLocalId {
                    symbol: symbol.clone(),
                });
            }
        }

        // Reserve the slot before descending so indices follow document order.
        self.nodes.push(Node {
            model,
            path: path.clone(),
            local_id,
            row: Row::new(),
            preset_id: None,
        });

        let mut row = Row::new();
        let mut preset_id = None;

        for (key, value) in object {
            if LOCAL_ID_KEYS.contains(&key.as_str()) {
                continue;
            }
            let field_path = format!("{path}.{key}");

            if key == model.table.id_column && model.table.id_kind == IdKind::Uuid {
                preset_id = Some(parse_uuid(value, key, &field_path)?);
            } else if let Some(column) = model.find_column(key) {
                if let Some(value) = convert(column, value, &field_path)? {
                    row.set(column.name, value);
                }
            } else if let Some(relation) = model.find_relation(key) {
                self.relate(index, relation, value, field_path)?;
            } else {
                return Err(ValidationError::UnknownField {
                    path,
                    model: model.name,
                    key: key.clone(),
                });
            }
        }

        if model.table.id_kind == IdKind::Uuid {
            preset_id.get_or_insert_with(Uuid::new_v4);
        }

        let node = &mut self.nodes[index];
        node.row = row;
        node.preset_id = preset_id;
        Ok(index)
    }

    fn relate(
        &mut self,
        owner: NodeIndex,
        relation: &'r Relation,
        value: &Value,
        path: String,
    ) -> Result<(), ValidationError> {
        let items: Vec<(&Value, String)> = match (relation.kind, value) {
            (_, Value::Null) => Vec::new(),
            (RelationKind::BelongsToOne { .. }, v) => vec![(v, path)],
            (_, Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (v, format!("{path}[{i}]")))
                .collect(),
            (_, v) => vec![(v, path)],
        };

        for (item, item_path) in items {
            let object = as_object(item, &item_path)?;
            let target = match reference_of(object, &item_path)? {
                Some(symbol) => {
                    if matches!(relation.kind, RelationKind::HasMany { .. }) {
                        return Err(ValidationError::ReferenceUnderHasMany {
                            path: item_path,
                            symbol,
                        });
                    }
                    if object.len() > 1 {
                        return Err(ValidationError::ReferenceWithFields { path: item_path });
                    }
                    Target::Symbol {
                        symbol,
                        path: item_path,
                    }
                }
                None => {
                    let model = self.registry.require(relation.target)?;
                    Target::Node(self.declare(model, object, item_path)?)
                }
            };
            self.pending.push(PendingEdge {
                relation,
                owner,
                target,
            });
        }
        Ok(())
    }
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::NotAnObject {
        path: path.to_owned(),
    })
}

fn symbol_under(
    object: &Map<String, Value>,
    keys: &[&str],
    path: &str,
) -> Result<Option<String>, ValidationError> {
    let mut found = keys.iter().filter_map(|k| object.get(*k));
    let Some(value) = found.next() else {
        return Ok(None);
    };
    let ambiguous = found.next().is_some();
    match value.as_str() {
        Some(s) if !s.is_empty() && !ambiguous => Ok(Some(s.to_owned())),
        _ => Err(ValidationError::InvalidLocalId {
            path: path.to_owned(),
        }),
    }
}

fn local_id_of(object: &Map<String, Value>, path: &str) -> Result<Option<String>, ValidationError> {
    symbol_under(object, &LOCAL_ID_KEYS, path)
}

fn reference_of(
    object: &Map<String, Value>,
    path: &str,
) -> Result<Option<String>, ValidationError> {
    symbol_under(object, &REFERENCE_KEYS, path)
}

fn parse_uuid(value: &Value, column: &str, path: &str) -> Result<Uuid, ValidationError> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| malformed(path, column, ColumnType::Uuid))
}

fn malformed(path: &str, column: &str, expected: ColumnType) -> ValidationError {
    ValidationError::MalformedValue {
        path: path.to_owned(),
        column: column.to_owned(),
        expected,
    }
}

/// Convert a JSON scalar to the column's type. `null` yields `None` so the
/// column falls back to its default.
fn convert(
    column: &Column,
    value: &Value,
    path: &str,
) -> Result<Option<FieldValue>, ValidationError> {
    if value.is_null() {
        return Ok(None);
    }
    let bad = || malformed(path, column.name, column.ty);

    let converted = match column.ty {
        ColumnType::Integer => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(FieldValue::Integer),
        ColumnType::BigInt => value.as_i64().map(FieldValue::BigInt),
        ColumnType::Text => value.as_str().map(|s| FieldValue::Text(s.to_owned())),
        ColumnType::Boolean => value.as_bool().map(FieldValue::Boolean),
        ColumnType::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(FieldValue::Date),
        ColumnType::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| FieldValue::Timestamp(dt.with_timezone(&Utc))),
        ColumnType::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(FieldValue::Uuid),
        ColumnType::Json => Some(FieldValue::Json(value.clone())),
    };
    converted.map(Some).ok_or_else(bad)
}
