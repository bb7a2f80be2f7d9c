#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Builds the full router over a fresh `MemoryStore` and provides request
/// helpers that return the status plus the decoded JSON body.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::error::{StoreError, StoreResult};
use taskboard_shared::models::task::{CreateTask, TaskFilter, TaskWithOwner, UpdateTask};
use taskboard_shared::models::user::{CreateUser, User, UserWithTasks};
use taskboard_shared::store::{MemoryStore, Store};
use tower::ServiceExt;

/// Store whose every operation fails as if the database were unreachable
pub struct FailingStore;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> StoreResult<()> {
        Err(unreachable())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserWithTasks>> {
        Err(unreachable())
    }

    async fn create_user(&self, _data: CreateUser) -> StoreResult<User> {
        Err(unreachable())
    }

    async fn delete_user(&self, _id: i32) -> StoreResult<()> {
        Err(unreachable())
    }

    async fn list_tasks(&self, _filter: TaskFilter) -> StoreResult<Vec<TaskWithOwner>> {
        Err(unreachable())
    }

    async fn create_task(&self, _data: CreateTask) -> StoreResult<TaskWithOwner> {
        Err(unreachable())
    }

    async fn update_task(&self, _id: i32, _data: UpdateTask) -> StoreResult<TaskWithOwner> {
        Err(unreachable())
    }

    async fn delete_task(&self, _id: i32) -> StoreResult<()> {
        Err(unreachable())
    }
}

/// Test context wrapping an application with its own empty store
pub struct TestContext {
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new context over an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Creates a context whose store fails every operation
    pub fn with_failing_store() -> Self {
        Self::with_store(Arc::new(FailingStore))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let state = AppState::new(store, Config::for_memory_store());
        TestContext {
            app: build_router(state),
        }
    }

    /// Sends a request; `body` is serialized as JSON when present
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    /// Creates a user through the API and returns its JSON
    pub async fn create_user(&self, email: &str, name: Option<&str>) -> Value {
        let (status, body) = self
            .send("POST", "/users", Some(json!({ "email": email, "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {}", body);
        body
    }

    /// Creates a task through the API and returns its JSON
    pub async fn create_task(&self, title: &str, user_id: i64) -> Value {
        let (status, body) = self
            .send("POST", "/tasks", Some(json!({ "title": title, "userId": user_id })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
        body
    }

    /// Lists tasks, optionally filtered by owner
    pub async fn list_tasks(&self, user_id: Option<i64>) -> Vec<Value> {
        let uri = match user_id {
            Some(id) => format!("/tasks?userId={}", id),
            None => "/tasks".to_string(),
        };
        let (status, body) = self.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().unwrap_or_default()
    }
}
