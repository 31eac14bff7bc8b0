//! Seed loader: inserts JSON seed documents through the graph seeder.
//!
//! # Usage
//!
//! ```bash
//! # Check documents against the lectionary registry without touching a database
//! cargo run -p lectio-seed-cli -- --validate-only seeds/*.json
//!
//! # Apply migrations, then seed each file in its own transaction
//! DATABASE_URL=postgres://localhost/lectio cargo run -p lectio-seed-cli -- \
//!     --migrate seeds/versions.json seeds/reading_day.json
//! ```
//!
//! Exits non-zero on the first document that fails; earlier documents stay
//! committed.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use lectio_api_migration::Migrator;
use lectio_core::tracing::init_tracing;
use lectio_seed::{DbSeedStore, GraphSeeder, Registry, SeedDocument, lectionary};

#[derive(Parser)]
#[command(about = "Insert nested seed documents into the Lectio database")]
struct Args {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Run pending migrations before seeding
    #[arg(long)]
    migrate: bool,

    /// Resolve every document but write nothing
    #[arg(long)]
    validate_only: bool,

    /// Seed documents, applied in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let registry = lectionary::registry().context("lectionary registry is inconsistent")?;
    let documents = args
        .files
        .iter()
        .map(|path| read_document(path).map(|doc| (path, doc)))
        .collect::<Result<Vec<_>>>()?;

    if args.validate_only {
        for (path, doc) in &documents {
            validate(&registry, path, doc)?;
        }
        return Ok(());
    }

    let Some(database_url) = args.database_url else {
        bail!("--database-url or DATABASE_URL is required unless --validate-only is set");
    };
    let db = Database::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    if args.migrate {
        Migrator::up(&db, None).await.context("migration failed")?;
        info!("migrations applied");
    }

    let seeder = GraphSeeder::new(registry, DbSeedStore::new(db));
    for (path, doc) in &documents {
        let outcome = seeder
            .seed(&doc.model, &doc.graph)
            .await
            .with_context(|| format!("seeding {} failed", path.display()))?;
        info!(
            file = %path.display(),
            roots = outcome.roots.len(),
            inserted = outcome.inserted,
            related = outcome.related,
            "seeded"
        );
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<SeedDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    SeedDocument::from_json(&raw)
        .with_context(|| format!("{} is not a seed document", path.display()))
}

fn validate(registry: &Registry, path: &Path, doc: &SeedDocument) -> Result<()> {
    let graph = lectio_seed::graph::resolve(registry, &doc.model, &doc.graph)
        .with_context(|| format!("{} does not resolve", path.display()))?;
    info!(
        file = %path.display(),
        model = %doc.model,
        nodes = graph.nodes().len(),
        joins = graph.join_edges().count(),
        "document valid"
    );
    Ok(())
}
