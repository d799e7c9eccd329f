use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait};
use todo_server::entities::task;
use todo_server::task::{Task, TaskService, TaskServiceError, ValidationError};

mod common;

async fn setup() -> DatabaseConnection {
    common::setup_db()
        .await
        .expect("Failed to setup test database")
}

async fn task_count(db: &DatabaseConnection) -> u64 {
    task::Entity::find()
        .count(db)
        .await
        .expect("Failed to count tasks")
}

#[tokio::test]
async fn can_add_task() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let created_task = task_service
        .add_task(
            "Test Task".to_string(),
            Some("Test Description".to_string()),
            false,
        )
        .await
        .expect("Failed to add task");

    let expected_task = Task::new(
        created_task.id(), // The ID is generated, so we use the created task's ID
        "Test Task".to_string(),
        Some("Test Description".to_string()),
        false,
    );
    assert_eq!(created_task, expected_task);

    let stored_task = task_service
        .get_task_by_id(created_task.id())
        .await
        .expect("Failed to get task");
    assert_eq!(stored_task, Some(expected_task));
}

#[tokio::test]
async fn can_add_task_without_description() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let created_task = task_service
        .add_task("Bare".to_string(), None, true)
        .await
        .expect("Failed to add task");

    assert_eq!(created_task.description(), None);
    assert!(created_task.done());
}

#[tokio::test]
async fn can_default_done_to_false_in_store() {
    let db = setup().await;

    let active_model = task::ActiveModel {
        title: ActiveValue::Set("Inserted directly".to_string()),
        ..Default::default()
    };
    active_model
        .insert(&db)
        .await
        .expect("Failed to insert task");

    let tasks = TaskService::new(&db)
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");
    assert_eq!(tasks.len(), 1);
    assert!(!tasks[0].done());
}

#[tokio::test]
async fn can_assign_distinct_ids() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let first = task_service
        .add_task("First".to_string(), None, false)
        .await
        .expect("Failed to add first task");
    let second = task_service
        .add_task("Second".to_string(), None, false)
        .await
        .expect("Failed to add second task");

    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn can_reject_empty_title_without_writing() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let result = task_service
        .add_task(String::new(), Some("description".to_string()), false)
        .await;

    match result {
        Err(TaskServiceError::Validation(err)) => {
            assert!(matches!(err, ValidationError::InvalidTitle(_)));
            assert_eq!(err.to_string(), "Task title is required");
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn can_reject_long_title_without_writing() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let result = task_service
        .add_task("a".repeat(256), Some("description".to_string()), false)
        .await;

    let err = result.expect_err("A 256 character title should be rejected");
    assert_eq!(err.to_string(), "Task title must be 255 characters or less");
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn can_reject_long_description_without_writing() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let result = task_service
        .add_task("title".to_string(), Some("a".repeat(1001)), false)
        .await;

    match result {
        Err(TaskServiceError::Validation(err)) => {
            assert!(matches!(err, ValidationError::InvalidDescription(_)));
            assert_eq!(
                err.to_string(),
                "Task description must be 1000 characters or less"
            );
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn can_update_task() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let initial_task = task_service
        .add_task("Initial".to_string(), Some("Old".to_string()), false)
        .await
        .expect("Failed to add task");

    let updated_task = task_service
        .update_task(
            initial_task.clone(),
            "new title".to_string(),
            Some("new description".to_string()),
            true,
        )
        .await
        .expect("Failed to update task");

    let expected_task = Task::new(
        initial_task.id(), // ID remains the same
        "new title".to_string(),
        Some("new description".to_string()),
        true,
    );
    assert_eq!(updated_task, expected_task);

    let stored_task = task_service
        .get_task_by_id(initial_task.id())
        .await
        .expect("Failed to get task");
    assert_eq!(stored_task, Some(expected_task));
}

#[tokio::test]
async fn can_clear_description_on_update() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let initial_task = task_service
        .add_task("Title".to_string(), Some("Remove me".to_string()), false)
        .await
        .expect("Failed to add task");

    let updated_task = task_service
        .update_task(initial_task, "Title".to_string(), None, false)
        .await
        .expect("Failed to update task");

    assert_eq!(updated_task.description(), None);
}

#[tokio::test]
async fn can_reject_invalid_update_and_keep_stored_task() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let initial_task = task_service
        .add_task("Keep me".to_string(), Some("Unchanged".to_string()), false)
        .await
        .expect("Failed to add task");

    let empty_title = task_service
        .update_task(initial_task.clone(), String::new(), None, true)
        .await;
    assert_eq!(
        empty_title.expect_err("Empty title should be rejected").to_string(),
        "Task title is required"
    );

    let long_title = task_service
        .update_task(initial_task.clone(), "a".repeat(256), None, true)
        .await;
    assert_eq!(
        long_title.expect_err("Long title should be rejected").to_string(),
        "Task title must be 255 characters or less"
    );

    let long_description = task_service
        .update_task(
            initial_task.clone(),
            "title".to_string(),
            Some("a".repeat(1001)),
            true,
        )
        .await;
    assert_eq!(
        long_description
            .expect_err("Long description should be rejected")
            .to_string(),
        "Task description must be 1000 characters or less"
    );

    let stored_task = task_service
        .get_task_by_id(initial_task.id())
        .await
        .expect("Failed to get task");
    assert_eq!(stored_task, Some(initial_task));
}

#[tokio::test]
async fn can_handle_update_when_task_not_found() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let missing_task = Task::new(999, "Ghost".to_string(), None, false);
    let result = task_service
        .update_task(missing_task, "Still a ghost".to_string(), None, true)
        .await;

    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn can_delete_task() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let task = task_service
        .add_task("Delete me".to_string(), None, false)
        .await
        .expect("Failed to add task");

    let deleted_task = task_service
        .delete_task(task.clone())
        .await
        .expect("Failed to delete task");
    assert_eq!(deleted_task, task);

    let lookup = task_service
        .get_task_by_id(task.id())
        .await
        .expect("Failed to look up task");
    assert_eq!(lookup, None);
}

#[tokio::test]
async fn can_handle_delete_when_task_not_found() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let missing_task = Task::new(999, "Ghost".to_string(), None, false);
    let result = task_service.delete_task(missing_task).await;

    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
}

#[tokio::test]
async fn can_return_none_for_unknown_id() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let lookup = task_service
        .get_task_by_id(1)
        .await
        .expect("Lookup of a missing task should not fail");

    assert_eq!(lookup, None);
}

#[tokio::test]
async fn can_get_all_tasks_in_insertion_order() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    for title in ["one", "two", "three"] {
        task_service
            .add_task(title.to_string(), None, false)
            .await
            .expect("Failed to add task");
    }

    let titles: Vec<String> = task_service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks")
        .iter()
        .map(|task| task.title().to_string())
        .collect();

    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn can_handle_empty_task_list() {
    let db = setup().await;
    let task_service = TaskService::new(&db);

    let tasks = task_service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");

    assert!(tasks.is_empty());
}
