//! Seed document loader.
//!
//! Loads JSON documents from the workspace `seeds/` directory.

use std::path::{Path, PathBuf};

use lectio_seed::SeedDocument;
use serde_json::Value;

/// # Example
/// ```no_run
/// use lectio_testing::fixture::Fixture;
/// let day = Fixture::seed("reading_day");
/// assert_eq!(day.model, "reading_day");
/// ```
pub struct Fixture;

impl Fixture {
    /// Load and parse `workspace_root/relative_path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = workspace_root().join(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }

    /// Load `seeds/<name>.json`.
    pub fn seed(name: &str) -> SeedDocument {
        let value = Self::load(&format!("seeds/{name}.json"));
        serde_json::from_value(value)
            .unwrap_or_else(|e| panic!("seeds/{name}.json is not a seed document: {e}"))
    }
}

fn workspace_root() -> PathBuf {
    let start = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());
    // Walk up from the crate dir to the directory that holds `seeds/`.
    let root = start
        .ancestors()
        .find(|dir| dir.join("seeds").is_dir())
        .map(Path::to_path_buf);
    root.unwrap_or(start)
}
