use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::task::{self, TaskState};

/// JSON body returned by the API when a request cannot be served.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServerErrorResponse {
    /// Human-readable description of the problem
    message: String,
}

impl ServerErrorResponse {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        task::api::get_tasks_handler,
        task::api::get_task_handler,
        task::api::create_task_handler,
        task::api::update_task_handler,
        task::api::delete_task_handler,
    ),
    components(schemas(task::api::TaskJson, ServerErrorResponse)),
    tags((name = "Tasks", description = "Read access to the task list"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document describing the JSON API.
#[tracing::instrument]
async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints, nested under `/api`.
pub fn create_api_router(task_state: Arc<TaskState>) -> Router {
    let api_routes = task::api::create_api_router(task_state)
        .route("/openapi.json", get(openapi_handler));
    Router::new().nest("/api", api_routes)
}
