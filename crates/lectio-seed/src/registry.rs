//! Model registry: which keys of a seed node are columns, which are
//! relations, and how each relation is persisted.

use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Database-assigned serial integer.
    Serial,
    /// UUID supplied by the document, or generated when absent.
    Uuid,
}

/// Physical table a model persists to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub id_column: &'static str,
    pub id_kind: IdKind,
}

impl Table {
    pub const fn serial(name: &'static str) -> Self {
        Self {
            name,
            id_column: "id",
            id_kind: IdKind::Serial,
        }
    }

    pub const fn uuid(name: &'static str) -> Self {
        Self {
            name,
            id_column: "id",
            id_kind: IdKind::Uuid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    BigInt,
    Text,
    Boolean,
    Date,
    Timestamp,
    Uuid,
    Json,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "a 32-bit integer",
            Self::BigInt => "a 64-bit integer",
            Self::Text => "a string",
            Self::Boolean => "a boolean",
            Self::Date => "a YYYY-MM-DD date",
            Self::Timestamp => "an RFC 3339 timestamp",
            Self::Uuid => "a UUID string",
            Self::Json => "any JSON value",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The owning row holds `foreign_key` pointing at the related row.
    BelongsToOne { foreign_key: &'static str },
    /// Each related row holds `foreign_key` pointing at the owning row.
    HasMany { foreign_key: &'static str },
    /// Rows in `through` pair the owning row (`from_column`) with the related
    /// row (`to_column`).
    ManyToMany {
        through: &'static str,
        from_column: &'static str,
        to_column: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub target: &'static str,
    pub kind: RelationKind,
}

#[derive(Debug, Clone)]
pub struct ModelDef {
    pub name: &'static str,
    pub table: Table,
    pub columns: Vec<Column>,
    pub relations: Vec<Relation>,
}

impl ModelDef {
    pub fn new(name: &'static str, table: Table) -> Self {
        Self {
            name,
            table,
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn column(mut self, name: &'static str, ty: ColumnType) -> Self {
        self.columns.push(Column { name, ty });
        self
    }

    pub fn belongs_to(
        mut self,
        name: &'static str,
        target: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        self.relations.push(Relation {
            name,
            target,
            kind: RelationKind::BelongsToOne { foreign_key },
        });
        self
    }

    pub fn has_many(
        mut self,
        name: &'static str,
        target: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        self.relations.push(Relation {
            name,
            target,
            kind: RelationKind::HasMany { foreign_key },
        });
        self
    }

    pub fn many_to_many(
        mut self,
        name: &'static str,
        target: &'static str,
        through: &'static str,
        from_column: &'static str,
        to_column: &'static str,
    ) -> Self {
        self.relations.push(Relation {
            name,
            target,
            kind: RelationKind::ManyToMany {
                through,
                from_column,
                to_column,
            },
        });
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn find_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// A closed set of models whose relation targets all resolve.
#[derive(Debug, Clone)]
pub struct Registry {
    models: Vec<ModelDef>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new(models: Vec<ModelDef>) -> Result<Self, ValidationError> {
        let by_name: HashMap<_, _> = models
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name, i))
            .collect();

        for model in &models {
            for relation in &model.relations {
                if !by_name.contains_key(relation.target) {
                    return Err(ValidationError::UnknownModel {
                        model: relation.target.to_owned(),
                    });
                }
            }
        }

        Ok(Self { models, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&ModelDef> {
        self.by_name.get(name).map(|&i| &self.models[i])
    }

    pub fn require(&self, name: &str) -> Result<&ModelDef, ValidationError> {
        self.get(name).ok_or_else(|| ValidationError::UnknownModel {
            model: name.to_owned(),
        })
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelDef> {
        self.models.iter()
    }
}
