/// PostgreSQL-backed store
///
/// Thin adapter from the model-level SQL functions (which speak
/// `sqlx::Error` and `Option`/`bool` for missing rows) to the `Store`
/// contract (which speaks [`StoreError`]).

use super::Store;
use crate::db::pool;
use crate::error::{StoreError, StoreResult};
use crate::models::task::{CreateTask, Task, TaskFilter, TaskWithOwner, UpdateTask};
use crate::models::user::{CreateUser, User, UserWithTasks};
use async_trait::async_trait;
use sqlx::PgPool;

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserWithTasks>> {
        Ok(User::list_with_tasks(&self.pool).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn delete_user(&self, id: i32) -> StoreResult<()> {
        if User::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::user_not_found(id))
        }
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskWithOwner>> {
        Ok(Task::list(&self.pool, filter).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<TaskWithOwner> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(&self, id: i32, data: UpdateTask) -> StoreResult<TaskWithOwner> {
        Task::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn delete_task(&self, id: i32) -> StoreResult<()> {
        if Task::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::task_not_found(id))
        }
    }
}
