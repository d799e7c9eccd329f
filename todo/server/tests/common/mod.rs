use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Opens a fresh in-memory SQLite database with the schema applied.
///
/// The pool is pinned to a single connection because every SQLite
/// in-memory connection sees its own private database.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();

    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
