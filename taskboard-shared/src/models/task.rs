/// Task model and database operations
///
/// Every task is owned by exactly one user. Task reads always join the owner
/// and return a [`TaskWithOwner`], whose embedded `user` is the trimmed
/// [`OwnerSummary`] (`id`, `name`, `email`) and never the owner's own task list.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_user_id_fkey FOREIGN KEY (user_id)
///         REFERENCES users(id) ON DELETE RESTRICT
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, TaskFilter, UpdateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// // Mark task 1 done without touching its title
/// let update = UpdateTask {
///     completed: Some(true),
///     ..Default::default()
/// };
/// Task::update(&pool, 1, update).await?;
///
/// // Newest first, only user 7's tasks
/// let tasks = Task::list(&pool, TaskFilter { user_id: Some(7) }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Columns selected for every owner-joined read; `t` is the task row, `u` its owner
const TASK_WITH_OWNER_COLUMNS: &str = "t.id, t.title, t.completed, t.user_id, \
     t.created_at, t.updated_at, u.name AS owner_name, u.email AS owner_email";

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-generated task ID
    pub id: i32,

    /// Task title
    pub title: String,

    /// Completion flag (false at creation)
    pub completed: bool,

    /// Owning user
    pub user_id: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Trimmed owner projection embedded in task responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
}

/// A task plus its owner projection
///
/// Serializes as the task's own fields plus a `user` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithOwner {
    #[serde(flatten)]
    pub task: Task,

    pub user: OwnerSummary,
}

/// Flat row shape produced by the owner join
#[derive(Debug, sqlx::FromRow)]
struct TaskWithOwnerRow {
    id: i32,
    title: String,
    completed: bool,
    user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_name: Option<String>,
    owner_email: String,
}

impl From<TaskWithOwnerRow> for TaskWithOwner {
    fn from(row: TaskWithOwnerRow) -> Self {
        TaskWithOwner {
            user: OwnerSummary {
                id: row.user_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            task: Task {
                id: row.id,
                title: row.title,
                completed: row.completed,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Owning user (must exist)
    pub user_id: i32,
}

/// Partial update for a task
///
/// `None` leaves the column unchanged; `Some(false)` is a real write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Applies the present fields to `task` in place
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Task list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks owned by this user
    pub user_id: Option<i32>,
}

impl TaskFilter {
    /// Whether `task` passes the filter
    pub fn matches(&self, task: &Task) -> bool {
        self.user_id.map_or(true, |user_id| task.user_id == user_id)
    }
}

impl Task {
    /// Creates a new task with `completed = false`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `user_id` does not reference an existing user (`tasks_user_id_fkey`)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<TaskWithOwner, sqlx::Error> {
        let query = format!(
            r#"
            WITH t AS (
                INSERT INTO tasks (title, user_id)
                VALUES ($1, $2)
                RETURNING id, title, completed, user_id, created_at, updated_at
            )
            SELECT {TASK_WITH_OWNER_COLUMNS}
            FROM t
            JOIN users u ON u.id = t.user_id
            "#
        );

        let row = sqlx::query_as::<_, TaskWithOwnerRow>(&query)
            .bind(data.title)
            .bind(data.user_id)
            .fetch_one(pool)
            .await?;

        Ok(row.into())
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<TaskWithOwner>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_WITH_OWNER_COLUMNS}
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE t.id = $1
            "#
        );

        let row = sqlx::query_as::<_, TaskWithOwnerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Lists tasks newest first, optionally restricted to one owner
    pub async fn list(pool: &PgPool, filter: TaskFilter) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_WITH_OWNER_COLUMNS}
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE ($1::INTEGER IS NULL OR t.user_id = $1)
            ORDER BY t.created_at DESC, t.id DESC
            "#
        );

        let rows = sqlx::query_as::<_, TaskWithOwnerRow>(&query)
            .bind(filter.user_id)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists every task without owner data, ordered by ID
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed, user_id, created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Only `Some` fields are written. `updated_at` is refreshed even when
    /// `data` is empty.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateTask,
    ) -> Result<Option<TaskWithOwner>, sqlx::Error> {
        let mut update = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            update.push_str(&format!(", title = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            update.push_str(&format!(", completed = ${}", bind_count));
        }

        update.push_str(
            " WHERE id = $1 RETURNING id, title, completed, user_id, created_at, updated_at",
        );

        let query = format!(
            "WITH t AS ({update}) SELECT {TASK_WITH_OWNER_COLUMNS} FROM t JOIN users u ON u.id = t.user_id"
        );

        let mut q = sqlx::query_as::<_, TaskWithOwnerRow>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let row = q.fetch_optional(pool).await?;

        Ok(row.map(Into::into))
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            completed: false,
            user_id: 9,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.is_empty());
        assert!(update.title.is_none());
        assert!(update.completed.is_none());
    }

    #[test]
    fn test_update_task_false_is_not_empty() {
        let update = UpdateTask {
            completed: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_apply_only_present_fields() {
        let mut task = sample_task();
        task.completed = true;

        UpdateTask {
            completed: Some(false),
            ..Default::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);

        UpdateTask {
            title: Some("Buy oat milk".to_string()),
            ..Default::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.title, "Buy oat milk");
        assert!(!task.completed);
    }

    #[test]
    fn test_filter_matches() {
        let task = sample_task();
        assert!(TaskFilter::default().matches(&task));
        assert!(TaskFilter { user_id: Some(9) }.matches(&task));
        assert!(!TaskFilter { user_id: Some(8) }.matches(&task));
    }

    #[test]
    fn test_task_with_owner_shape() {
        let row = TaskWithOwnerRow {
            id: 1,
            title: "Buy milk".to_string(),
            completed: false,
            user_id: 9,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_name: Some("Ada".to_string()),
            owner_email: "ada@example.com".to_string(),
        };

        let value = serde_json::to_value(TaskWithOwner::from(row)).unwrap();

        assert_eq!(value["title"], "Buy milk");
        assert_eq!(value["completed"], false);
        assert_eq!(value["userId"], 9);
        assert_eq!(
            value["user"],
            json!({ "id": 9, "name": "Ada", "email": "ada@example.com" })
        );
    }
}
