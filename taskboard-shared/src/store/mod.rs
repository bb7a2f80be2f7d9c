/// Persistence gateway
///
/// Handlers never touch SQL directly. They receive an `Arc<dyn Store>` and
/// call one operation per request. Two backends exist:
///
/// - [`PgStore`]: PostgreSQL via a `sqlx` pool (production)
/// - [`MemoryStore`]: maps behind a lock (tests, database-less runs)
///
/// Both enforce the same rules: unique user email, task owner must exist,
/// users that still own tasks cannot be deleted, task lists are newest first.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::models::user::CreateUser;
/// use taskboard_shared::store::{MemoryStore, Store};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskboard_shared::error::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let user = store.create_user(CreateUser {
///     email: "ada@example.com".to_string(),
///     name: None,
/// }).await?;
/// assert_eq!(user.id, 1);
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::StoreResult;
use crate::models::task::{CreateTask, TaskFilter, TaskWithOwner, UpdateTask};
use crate::models::user::{CreateUser, User, UserWithTasks};
use async_trait::async_trait;

/// Data access boundary for users and tasks
#[async_trait]
pub trait Store: Send + Sync {
    /// Checks the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// All users with their tasks embedded
    async fn list_users(&self) -> StoreResult<Vec<UserWithTasks>>;

    /// Creates a user; duplicate emails fail with `UniqueViolation`
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Deletes a user; fails with `ForeignKeyViolation` while it owns tasks
    async fn delete_user(&self, id: i32) -> StoreResult<()>;

    /// Tasks newest first, optionally for one owner
    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskWithOwner>>;

    /// Creates an incomplete task; unknown owners fail with `ForeignKeyViolation`
    async fn create_task(&self, data: CreateTask) -> StoreResult<TaskWithOwner>;

    /// Writes only the fields present in `data`
    async fn update_task(&self, id: i32, data: UpdateTask) -> StoreResult<TaskWithOwner>;

    /// Deletes a task
    async fn delete_task(&self, id: i32) -> StoreResult<()>;
}
