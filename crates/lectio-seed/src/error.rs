use crate::registry::ColumnType;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Rejections found before any transaction is opened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown model `{model}`")]
    UnknownModel { model: String },
    #[error("{path}: expected an object")]
    NotAnObject { path: String },
    #[error("{path}: `{model}` has no field or relation `{key}`")]
    UnknownField {
        path: String,
        model: &'static str,
        key: String,
    },
    #[error("{path}: expected {expected} for `{column}`")]
    MalformedValue {
        path: String,
        column: String,
        expected: ColumnType,
    },
    #[error("{path}: local id must be a non-empty string")]
    InvalidLocalId { path: String },
    #[error("local id `{symbol}` is declared more than once")]
    DuplicateLocalId { symbol: String },
    #[error("reference `{symbol}` does not match any local id")]
    UnresolvedReference { symbol: String },
    #[error("{path}: reference `{symbol}` points at a `{found}`, expected `{expected}`")]
    ReferenceModelMismatch {
        path: String,
        symbol: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{path}: reference `{symbol}` cannot be used under a has-many relation")]
    ReferenceUnderHasMany { path: String, symbol: String },
    #[error("{path}: a reference node cannot carry other keys")]
    ReferenceWithFields { path: String },
    #[error("{path}: the root of a graph cannot be a reference")]
    ReferenceAtRoot { path: String },
    #[error("{path}: dependency cycle through this node")]
    DependencyCycle { path: String },
}

/// Failures raised by a storage backend while a seed transaction is open.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
