/// In-memory store
///
/// Mirrors the PostgreSQL schema rules so handler tests exercise the same
/// failure paths as production: sequential IDs starting at 1, unique email,
/// task owner must exist, owners with tasks cannot be deleted.

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::models::task::{CreateTask, Task, TaskFilter, TaskWithOwner, UpdateTask};
use crate::models::user::{group_tasks_by_owner, CreateUser, User, UserWithTasks};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl Tables {
    fn with_owner(&self, task: &Task) -> StoreResult<TaskWithOwner> {
        let owner = self
            .users
            .get(&task.user_id)
            .ok_or_else(|| StoreError::user_not_found(task.user_id))?;

        Ok(TaskWithOwner {
            task: task.clone(),
            user: owner.summary(),
        })
    }
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserWithTasks>> {
        let tables = self.tables.read().await;

        let users = tables.users.values().cloned().collect();
        let tasks = tables.tasks.values().cloned().collect();

        Ok(group_tasks_by_owner(users, tasks))
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            email: data.email,
            name: data.name,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&id) {
            return Err(StoreError::user_not_found(id));
        }
        if tables.tasks.values().any(|t| t.user_id == id) {
            return Err(StoreError::ForeignKeyViolation("tasks_user_id_fkey".to_string()));
        }

        tables.users.remove(&id);
        Ok(())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<TaskWithOwner>> {
        let tables = self.tables.read().await;

        let mut tasks: Vec<&Task> = tables.tasks.values().filter(|t| filter.matches(t)).collect();
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        tasks.into_iter().map(|t| tables.with_owner(t)).collect()
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<TaskWithOwner> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::ForeignKeyViolation("tasks_user_id_fkey".to_string()));
        }

        tables.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.last_task_id,
            title: data.title,
            completed: false,
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        };

        tables.tasks.insert(task.id, task.clone());
        tables.with_owner(&task)
    }

    async fn update_task(&self, id: i32, data: UpdateTask) -> StoreResult<TaskWithOwner> {
        let mut tables = self.tables.write().await;

        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::task_not_found(id))?;

        data.apply_to(task);
        task.updated_at = Utc::now();

        let task = task.clone();
        tables.with_owner(&task)
    }

    async fn delete_task(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        tables
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::task_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user(email: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                email: email.to_string(),
                name: Some("Ada".to_string()),
            })
            .await
            .unwrap();
        (store, user)
    }

    async fn add_task(store: &MemoryStore, user_id: i32, title: &str) -> TaskWithOwner {
        store
            .create_task(CreateTask {
                title: title.to_string(),
                user_id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let (store, first) = store_with_user("a@example.com").await;
        let second = store
            .create_user(CreateUser {
                email: "b@example.com".to_string(),
                name: None,
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_user("a@example.com").await;

        let result = store
            .create_user(CreateUser {
                email: "a@example.com".to_string(),
                name: None,
            })
            .await;

        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_task_requires_existing_owner() {
        let store = MemoryStore::new();

        let result = store
            .create_task(CreateTask {
                title: "orphan".to_string(),
                user_id: 42,
            })
            .await;

        assert!(matches!(result, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_created_task_embeds_owner_summary() {
        let (store, user) = store_with_user("a@example.com").await;

        let created = add_task(&store, user.id, "Buy milk").await;

        assert!(!created.task.completed);
        assert_eq!(created.task.user_id, user.id);
        assert_eq!(created.user, user.summary());
    }

    #[tokio::test]
    async fn test_list_tasks_newest_first_and_filtered() {
        let (store, ada) = store_with_user("a@example.com").await;
        let bob = store
            .create_user(CreateUser {
                email: "b@example.com".to_string(),
                name: None,
            })
            .await
            .unwrap();

        let first = add_task(&store, ada.id, "first").await;
        add_task(&store, bob.id, "bob's").await;
        let third = add_task(&store, ada.id, "third").await;

        let all = store.list_tasks(TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].task.title, "third");
        assert_eq!(all[2].task.title, "first");

        let ada_tasks = store
            .list_tasks(TaskFilter { user_id: Some(ada.id) })
            .await
            .unwrap();
        let ids: Vec<i32> = ada_tasks.iter().map(|t| t.task.id).collect();
        assert_eq!(ids, vec![third.task.id, first.task.id]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_fields() {
        let (store, user) = store_with_user("a@example.com").await;
        let created = add_task(&store, user.id, "Buy milk").await;

        let updated = store
            .update_task(
                created.task.id,
                UpdateTask {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.task.title, "Buy milk");
        assert!(updated.task.completed);

        let unchanged = store
            .update_task(created.task.id, UpdateTask::default())
            .await
            .unwrap();
        assert_eq!(unchanged.task.title, "Buy milk");
        assert!(unchanged.task.completed);
        assert!(unchanged.task.updated_at >= updated.task.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_task() {
        let store = MemoryStore::new();

        let update = store.update_task(5, UpdateTask::default()).await;
        assert!(matches!(update, Err(StoreError::NotFound { entity: "task", id: 5 })));

        let delete = store.delete_task(5).await;
        assert!(matches!(delete, Err(StoreError::NotFound { entity: "task", id: 5 })));
    }

    #[tokio::test]
    async fn test_delete_user_with_tasks_is_restricted() {
        let (store, user) = store_with_user("a@example.com").await;
        let task = add_task(&store, user.id, "Buy milk").await;

        let blocked = store.delete_user(user.id).await;
        assert!(matches!(blocked, Err(StoreError::ForeignKeyViolation(_))));
        assert_eq!(store.list_users().await.unwrap().len(), 1);

        store.delete_task(task.task.id).await.unwrap();
        store.delete_user(user.id).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_users_embeds_tasks() {
        let (store, user) = store_with_user("a@example.com").await;
        add_task(&store, user.id, "one").await;
        add_task(&store, user.id, "two").await;

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].tasks.len(), 2);
        assert_eq!(users[0].tasks[0].title, "one");
    }
}
