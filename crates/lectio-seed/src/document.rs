//! On-disk seed file format.

use serde::Deserialize;
use serde_json::Value;

/// A seed file: the root model name plus one node or an array of nodes.
///
/// ```json
/// { "model": "version", "graph": [{ "code": "NRSV" }] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SeedDocument {
    pub model: String,
    pub graph: Value,
}

impl SeedDocument {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
