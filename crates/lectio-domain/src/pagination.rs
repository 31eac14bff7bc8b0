//! Offset/limit window used by list endpoints.

use serde::{Deserialize, Serialize};

/// Largest `limit` a client may ask for.
pub const MAX_LIMIT: u64 = 100;

/// Offset/limit parameters. `offset` defaults to the first row; an absent
/// `limit` means "everything from `offset` on".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl Window {
    /// `None` when an explicit `limit` falls outside 1–[`MAX_LIMIT`].
    pub fn validated(self) -> Option<Self> {
        match self.limit {
            Some(limit) if !(1..=MAX_LIMIT).contains(&limit) => None,
            _ => Some(self),
        }
    }
}
