use axum::Router;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::{TaskState, create_task_router};

pub mod api;

/// Builds the complete application router on top of an open database connection.
pub fn create_app(db: DatabaseConnection) -> Router {
    let task_state = Arc::new(TaskState { db });

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_task_router(task_state.clone()))
        .merge(api::create_api_router(task_state))
        .layer(TraceLayer::new_for_http())
}

/// Connects to the database, makes sure the schema exists and serves the application.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database schema is up to date");

    let server_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    axum::serve(listener, create_app(db)).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
