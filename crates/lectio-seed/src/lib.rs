//! Transactional insertion of nested entity graphs.
//!
//! A seed document is a tree of nodes keyed by a [`registry::Registry`].
//! Nodes may declare a symbolic `localId` (alias `#id`) and other nodes may
//! stand in for them with `{"reference": ...}` (alias `#ref`). The
//! [`GraphSeeder`] resolves every reference before opening a transaction,
//! inserts rows in dependency order, then writes join rows.

pub mod document;
pub mod error;
pub mod graph;
pub mod infra;
pub mod lectionary;
mod plan;
pub mod registry;
pub mod seeder;
pub mod store;

pub use crate::document::SeedDocument;
pub use crate::error::{SeedError, StoreError, ValidationError};
pub use crate::graph::ResolvedGraph;
pub use crate::infra::db::DbSeedStore;
pub use crate::infra::memory::MemoryStore;
pub use crate::registry::Registry;
pub use crate::seeder::{GraphSeeder, SeedOutcome};
pub use crate::store::{FieldValue, Row, RowId, SeedStore, SeedTx};
