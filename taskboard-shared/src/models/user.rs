/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: None,
/// }).await?;
///
/// for entry in User::list_with_tasks(&pool).await? {
///     println!("{} owns {} tasks", entry.user.email, entry.tasks.len());
/// }
/// # Ok(())
/// # }
/// ```

use super::task::{OwnerSummary, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated user ID
    pub id: i32,

    /// Email address, unique across all users
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// A user together with every task it owns
///
/// Serializes as the user's own fields plus a `tasks` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithTasks {
    #[serde(flatten)]
    pub user: User,

    pub tasks: Vec<Task>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (uniqueness is enforced by the store)
    pub email: String,

    /// Optional display name
    pub name: Option<String>,
}

impl User {
    /// Trimmed `{id, name, email}` view embedded in task responses
    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (`users_email_key` violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists all users, each with the tasks it owns
    ///
    /// Runs two queries (users, then tasks) and groups tasks by owner in
    /// memory. Users and their tasks are both ordered by ID.
    pub async fn list_with_tasks(pool: &PgPool) -> Result<Vec<UserWithTasks>, sqlx::Error> {
        let users = Self::list(pool).await?;
        let tasks = Task::list_all(pool).await?;

        Ok(group_tasks_by_owner(users, tasks))
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation while the user still owns tasks.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Attaches each task to its owner, preserving the order of both inputs
pub(crate) fn group_tasks_by_owner(users: Vec<User>, tasks: Vec<Task>) -> Vec<UserWithTasks> {
    let mut by_owner: HashMap<i32, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_owner.entry(task.user_id).or_default().push(task);
    }

    users
        .into_iter()
        .map(|user| {
            let tasks = by_owner.remove(&user.id).unwrap_or_default();
            UserWithTasks { user, tasks }
        })
        .collect()
}
