//! Database migration command.
//!
//! Creates one `(id TEXT PRIMARY KEY, doc JSONB NOT NULL)` table per
//! collection. Idempotent; safe to rerun.
//!
//! # Environment Variables
//!
//! - `STOREHUB_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use tracing::info;

use store_hub_api::db;

/// Collections backed by a document table.
const COLLECTIONS: &[&str] = &["users", "stores", "products"];

/// Create the collection tables.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a statement fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    for collection in COLLECTIONS {
        info!("Ensuring table '{collection}' exists...");
        let sql =
            format!("CREATE TABLE IF NOT EXISTS {collection} (id TEXT PRIMARY KEY, doc JSONB NOT NULL)");
        sqlx::query(&sql).execute(&pool).await?;
    }

    info!("Migrations complete!");
    Ok(())
}
