/// Database models for Taskboard
///
/// This module contains the two persisted entities and their SQL operations.
///
/// # Models
///
/// - `user`: Users, who own tasks
/// - `task`: Tasks, each owned by exactly one user
///
/// JSON representations use camelCase keys (`userId`, `createdAt`, ...)
/// because that is what the browser client consumes.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task};
/// use taskboard_shared::models::user::{CreateUser, User};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "ada@example.com".to_string(),
///     name: Some("Ada".to_string()),
/// }).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Buy milk".to_string(),
///     user_id: user.id,
/// }).await?;
/// assert!(!task.task.completed);
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
