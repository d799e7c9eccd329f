use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::task::{Task, TaskService, TaskServiceError, ValidationError};

/// Checkbox values a browser or client may submit for a ticked `done` box.
const CHECKED_VALUES: [&str; 5] = ["on", "true", "y", "yes", "1"];

/// Form submitted by both the add and edit pages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    title: String,
    description: String,
    done: Option<String>,
}

impl TaskForm {
    /// An unticked checkbox is not submitted at all.
    fn is_done(&self) -> bool {
        self.done
            .as_deref()
            .is_some_and(|value| CHECKED_VALUES.contains(&value.to_ascii_lowercase().as_str()))
    }

    /// An empty description box means no description.
    fn description(&self) -> Option<String> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        }
    }
}

/// Values shown in the add and edit forms.
#[derive(Debug, Default)]
struct TaskFormView {
    title: String,
    description: String,
    done: bool,
}

impl From<&Task> for TaskFormView {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            description: task.description().unwrap_or_default().to_string(),
            done: task.done(),
        }
    }
}

impl From<&TaskForm> for TaskFormView {
    fn from(form: &TaskForm) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            done: form.is_done(),
        }
    }
}

/// Custom error type for task handler operations.
#[derive(Debug, thiserror::Error)]
enum TaskError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a task service error.
    #[error("Task service error")]
    Service(#[from] TaskServiceError),
    /// Represents a request for a task that does not exist.
    #[error("Task with ID {0} not found")]
    NotFound(u32),
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let (status_code, user_facing_error_message) = match self {
            TaskError::NotFound(_) | TaskError::Service(TaskServiceError::TaskNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "The requested task does not exist. It may have been deleted.",
            ),
            err => {
                tracing::error!("Task request failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred while processing your request. Please try again later.",
                )
            }
        };

        let error_template = ErrorMessageTemplate::new(user_facing_error_message.to_string());
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        (status_code, Html(rendered)).into_response()
    }
}

#[derive(Template)]
#[template(path = "tasks/task_list.html")]
struct TaskListTemplate {
    tasks: Vec<Task>,
}

impl TaskListTemplate {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[derive(Template)]
#[template(path = "tasks/add_task.html")]
struct AddTaskTemplate {
    form: TaskFormView,
    error: Option<String>,
}

impl AddTaskTemplate {
    pub fn new(form: TaskFormView, error: Option<String>) -> Self {
        Self { form, error }
    }
}

#[derive(Template)]
#[template(path = "tasks/edit_task.html")]
struct EditTaskTemplate {
    task_id: u32,
    form: TaskFormView,
    error: Option<String>,
}

impl EditTaskTemplate {
    pub fn new(task_id: u32, form: TaskFormView, error: Option<String>) -> Self {
        Self {
            task_id,
            form,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "tasks/error_message.html")]
struct ErrorMessageTemplate {
    message: String,
}

impl ErrorMessageTemplate {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: sea_orm::DatabaseConnection,
}

/// Renders a form template with the validation message, as 422 Unprocessable Entity.
fn render_invalid_form<T: Template>(
    template: T,
    err: &ValidationError,
) -> Result<Response, TaskError> {
    tracing::info!("Rejected task form: {}", err);
    let rendered = template.render()?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(rendered)).into_response())
}

/// Handler for the / endpoint that displays all tasks.
#[tracing::instrument(skip(state))]
async fn task_list_handler(State(state): State<Arc<TaskState>>) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);
    let tasks = task_service.get_all_tasks().await?;
    let template = TaskListTemplate::new(tasks);
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for serving the empty add task form.
#[tracing::instrument]
async fn add_task_form_handler() -> Result<Html<String>, TaskError> {
    let template = AddTaskTemplate::new(TaskFormView::default(), None);
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for creating a new task via POST request.
#[tracing::instrument(skip(state))]
async fn add_task_handler(
    State(state): State<Arc<TaskState>>,
    Form(form): Form<TaskForm>,
) -> Result<Response, TaskError> {
    let task_service = TaskService::new(&state.db);

    match task_service
        .add_task(form.title.clone(), form.description(), form.is_done())
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(TaskServiceError::Validation(err)) => {
            let template = AddTaskTemplate::new(TaskFormView::from(&form), Some(err.to_string()));
            render_invalid_form(template, &err)
        }
        Err(err) => Err(TaskError::Service(err)),
    }
}

/// Handler for serving the edit form pre-filled with the task's current values.
#[tracing::instrument(skip(state))]
async fn edit_task_form_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
) -> Result<Html<String>, TaskError> {
    let task_service = TaskService::new(&state.db);
    let task = task_service
        .get_task_by_id(id)
        .await?
        .ok_or(TaskError::NotFound(id))?;

    let template = EditTaskTemplate::new(task.id(), TaskFormView::from(&task), None);
    template.render().map(Html).map_err(TaskError::from)
}

/// Handler for updating a task via POST request.
#[tracing::instrument(skip(state))]
async fn edit_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
    Form(form): Form<TaskForm>,
) -> Result<Response, TaskError> {
    let task_service = TaskService::new(&state.db);
    let task = task_service
        .get_task_by_id(id)
        .await?
        .ok_or(TaskError::NotFound(id))?;

    match task_service
        .update_task(task, form.title.clone(), form.description(), form.is_done())
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(TaskServiceError::Validation(err)) => {
            let template =
                EditTaskTemplate::new(id, TaskFormView::from(&form), Some(err.to_string()));
            render_invalid_form(template, &err)
        }
        Err(err) => Err(TaskError::Service(err)),
    }
}

/// Handler for deleting a task via POST request. Always redirects to the task list.
#[tracing::instrument(skip(state))]
async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
) -> Result<Redirect, TaskError> {
    let task_service = TaskService::new(&state.db);

    // Ids outside the u32 range can never have been assigned.
    let existing_task = match u32::try_from(id) {
        Ok(id) => task_service.get_task_by_id(id).await?,
        Err(_) => None,
    };

    match existing_task {
        Some(task) => match task_service.delete_task(task).await {
            Ok(_) | Err(TaskServiceError::TaskNotFound(_)) => {}
            Err(err) => return Err(TaskError::Service(err)),
        },
        None => tracing::warn!("Ignoring delete of missing task {}", id),
    }

    Ok(Redirect::to("/"))
}

/// Creates and returns the task router with all server-rendered task routes.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/", get(task_list_handler))
        .route("/add", get(add_task_form_handler).post(add_task_handler))
        .route(
            "/edit/{id}",
            get(edit_task_form_handler).post(edit_task_handler),
        )
        .route("/delete/{id}", post(delete_task_handler))
        .with_state(state)
}
