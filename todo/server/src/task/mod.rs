use crate::entities::*;
use sea_orm::*;
use std::fmt;

pub mod api;
pub mod validation;
pub mod web;

pub use validation::ValidationError;
pub use web::{TaskState, create_task_router};

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Task {
    id: u32,
    title: String,
    description: Option<String>,
    done: bool,
}

impl Task {
    pub fn new(id: u32, title: String, description: Option<String>, done: bool) -> Self {
        Self {
            id,
            title,
            description,
            done,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the task is done.
    pub fn done(&self) -> bool {
        self.done
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Task {}>", self.title)
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(model.id as u32, model.title, model.description, model.done)
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a rejected title or description.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Represents a task whose row no longer exists.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Retrieves all tasks from the database, oldest first.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// A missing task is not an error: the result is `Ok(None)`.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Option<Task>, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id as i32).one(self.db).await?;
        Ok(task_model.map(Task::from))
    }

    /// Creates a new task in the database.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the task.
    /// * `description` - An optional longer description.
    /// * `done` - Whether the task starts out completed.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    /// Nothing is written when validation fails.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(
        &self,
        title: String,
        description: Option<String>,
        done: bool,
    ) -> Result<Task, TaskServiceError> {
        validation::validate_title(&title)?;
        validation::validate_description(description.as_deref())?;

        let active_model = task::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            done: ActiveValue::Set(done),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        let created_task = Task::from(created_model);
        tracing::info!("Created task {} {}", created_task.id(), created_task);
        Ok(created_task)
    }

    /// Replaces the title, description and done flag of an existing task.
    ///
    /// # Arguments
    ///
    /// * `task` - The task to update.
    /// * `title` - The new title.
    /// * `description` - The new description.
    /// * `done` - The new done flag.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    /// The stored record is left untouched when validation fails.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        task: Task,
        title: String,
        description: Option<String>,
        done: bool,
    ) -> Result<Task, TaskServiceError> {
        validation::validate_title(&title)?;
        validation::validate_description(description.as_deref())?;

        let active_model = task::ActiveModel {
            id: ActiveValue::Unchanged(task.id() as i32),
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            done: ActiveValue::Set(done),
        };
        let updated_model = match active_model.update(self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => return Err(TaskServiceError::TaskNotFound(task.id())),
            Err(err) => return Err(TaskServiceError::Database(err)),
        };

        let updated_task = Task::from(updated_model);
        tracing::info!("Updated task {} {}", updated_task.id(), updated_task);
        Ok(updated_task)
    }

    /// Deletes a task from the database.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task`, or `TaskNotFound` if its row was already gone.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, task: Task) -> Result<Task, TaskServiceError> {
        let delete_result = task::Entity::delete_by_id(task.id() as i32)
            .exec(self.db)
            .await?;
        if delete_result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(task.id()));
        }
        tracing::info!("Deleted task {} {}", task.id(), task);
        Ok(task)
    }
}
