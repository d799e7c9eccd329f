use crate::task::web::TaskState;
use crate::task::{Task, TaskService};
use crate::web::api::ServerErrorResponse;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    id: u32,
    /// Short title of the task
    title: String,
    /// Optional longer description
    description: Option<String>,
    /// Whether the task has been completed
    done: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            done: task.done(),
        }
    }
}

type ApiError = (StatusCode, Json<ServerErrorResponse>);

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerErrorResponse::new(message.to_string())),
    )
}

/// Handler for GET /api/tasks - Returns all tasks in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = Vec<TaskJson>),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let service = TaskService::new(&state.db);

    match service.get_all_tasks().await {
        Ok(tasks) => Ok(Json(tasks.into_iter().map(TaskJson::from).collect())),
        Err(err) => {
            tracing::error!("Failed to get tasks: {}", err);
            Err(internal_error("Failed to retrieve tasks"))
        }
    }
}

/// Handler for GET /api/task/{id} - Returns a single task in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/task/{id}",
    params(
        ("id" = u32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the task", body = TaskJson),
        (status = 404, description = "Task not found", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
) -> Result<Json<TaskJson>, ApiError> {
    let service = TaskService::new(&state.db);

    match service.get_task_by_id(id).await {
        Ok(Some(task)) => Ok(Json(TaskJson::from(task))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ServerErrorResponse::new("Task not found".to_string())),
        )),
        Err(err) => {
            tracing::error!("Failed to get task {}: {}", id, err);
            Err(internal_error("Failed to retrieve task"))
        }
    }
}

// Write endpoints are routed but not implemented yet; they never touch the store.

/// Handler for POST /api/task.
#[tracing::instrument]
#[utoipa::path(
    post,
    path = "/api/task",
    responses((status = 501, description = "Not implemented")),
    tag = "Tasks"
)]
pub async fn create_task_handler() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

/// Handler for PUT /api/task/{id}.
#[tracing::instrument]
#[utoipa::path(
    put,
    path = "/api/task/{id}",
    params(("id" = u32, Path, description = "Task ID")),
    responses((status = 501, description = "Not implemented")),
    tag = "Tasks"
)]
pub async fn update_task_handler(Path(id): Path<u32>) -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

/// Handler for DELETE /api/task/{id}.
#[tracing::instrument]
#[utoipa::path(
    delete,
    path = "/api/task/{id}",
    params(("id" = u32, Path, description = "Task ID")),
    responses((status = 501, description = "Not implemented")),
    tag = "Tasks"
)]
pub async fn delete_task_handler(Path(id): Path<u32>) -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

/// Creates and returns the tasks API router. Paths are relative to the `/api` prefix.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler))
        .route("/task", post(create_task_handler))
        .route(
            "/task/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
