/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks?userId=` - List tasks newest first, optionally for one owner
/// - `POST /tasks` - Create task
/// - `PUT /tasks/:id` - Partially update task
/// - `DELETE /tasks/:id` - Delete task
///
/// Every task in a response embeds its owner as `{id, name, email}`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, SuccessResponse},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use taskboard_shared::models::task::{CreateTask, TaskFilter, TaskWithOwner, UpdateTask};

const FETCH_FAILED: &str = "Failed to fetch tasks";
const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_FAILED: &str = "Failed to delete task";

/// Message returned with 400 when task creation input is incomplete
pub const MISSING_FIELDS: &str = "Title and userId are required";

/// Query string for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Owner filter; empty means no filter
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl ListTasksQuery {
    /// Converts the raw query into a store filter
    pub fn filter(&self) -> Result<TaskFilter, String> {
        let user_id = match self.user_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|e| format!("Invalid userId {:?}: {}", raw, e))?,
            ),
        };

        Ok(TaskFilter { user_id })
    }
}

/// Create task request
///
/// Both fields are decoded loosely so that any falsy value (absent, null,
/// `false`, `0`, `""`) produces the 400 below rather than a decoding failure.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<Value>,
    pub user_id: Option<Value>,
}

impl CreateTaskRequest {
    /// Validated store input
    ///
    /// Falsy title or userId is a 400. A userId given as a numeric string is
    /// accepted; a non-string title or a userId that is not a whole number
    /// fails the operation.
    pub fn into_create_task(self) -> ApiResult<CreateTask> {
        if !is_truthy(self.title.as_ref()) || !is_truthy(self.user_id.as_ref()) {
            return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
        }

        let Some(Value::String(title)) = self.title else {
            return Err(ApiError::invalid_request(CREATE_FAILED, "title must be a string"));
        };

        let user_id = self
            .user_id
            .as_ref()
            .and_then(coerce_user_id)
            .ok_or_else(|| ApiError::invalid_request(CREATE_FAILED, "userId must be a whole number"))?;

        Ok(CreateTask { title, user_id })
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn coerce_user_id(value: &Value) -> Option<i32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    // fract() is NaN for infinities, which fails the comparison too
    if number.fract() != 0.0 || number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return None;
    }

    Some(number as i32)
}

/// Update task request
///
/// Each field is `None` when absent from the body and `Some(None)` when sent
/// as an explicit `null`. Tasks have no nullable columns, so a `null` field
/// fails the update instead of being skipped.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateTaskRequest> for UpdateTask {
    type Error = String;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let title = match req.title {
            Some(None) => return Err("title cannot be null".to_string()),
            other => other.flatten(),
        };
        let completed = match req.completed {
            Some(None) => return Err("completed cannot be null".to_string()),
            other => other.flatten(),
        };

        Ok(UpdateTask { title, completed })
    }
}

/// List tasks
///
/// # Endpoint
///
/// ```text
/// GET /tasks
/// GET /tasks?userId=1
/// ```
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 4,
///     "title": "Buy milk",
///     "completed": false,
///     "userId": 1,
///     "createdAt": "2025-01-03T12:00:00Z",
///     "updatedAt": "2025-01-03T12:00:00Z",
///     "user": { "id": 1, "name": "Ada", "email": "ada@example.com" }
///   }
/// ]
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskWithOwner>>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_request(FETCH_FAILED, e.body_text()))?;
    let filter = query
        .filter()
        .map_err(|e| ApiError::invalid_request(FETCH_FAILED, e))?;

    let tasks = state
        .store
        .list_tasks(filter)
        .await
        .map_err(|e| ApiError::operation(FETCH_FAILED, e))?;

    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// { "title": "Buy milk", "userId": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: title or userId missing or falsy
/// - `500 Internal Server Error`: unknown user, non-numeric userId, unreadable
///   body, store failure
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskWithOwner>)> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_request(CREATE_FAILED, e.body_text()))?;

    let data = req.into_create_task()?;

    let task = state
        .store
        .create_task(data)
        .await
        .map_err(|e| ApiError::operation(CREATE_FAILED, e))?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/:id
/// Content-Type: application/json
///
/// { "completed": true }
/// ```
///
/// An empty object is accepted and changes nothing but `updatedAt`. An
/// explicit `null` for either field fails with a 500.
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<TaskWithOwner>> {
    let Path(id) = id.map_err(|e| ApiError::invalid_request(UPDATE_FAILED, e.body_text()))?;
    let Json(req) = payload.map_err(|e| ApiError::invalid_request(UPDATE_FAILED, e.body_text()))?;
    let data = UpdateTask::try_from(req).map_err(|e| ApiError::invalid_request(UPDATE_FAILED, e))?;

    let task = state
        .store
        .update_task(id, data)
        .await
        .map_err(|e| ApiError::operation(UPDATE_FAILED, e))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Endpoint
///
/// ```text
/// DELETE /tasks/:id
/// ```
///
/// # Response
///
/// ```json
/// { "message": "Task deleted successfully" }
/// ```
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(id) = id.map_err(|e| ApiError::invalid_request(DELETE_FAILED, e.body_text()))?;

    state
        .store
        .delete_task(id)
        .await
        .map_err(|e| ApiError::operation(DELETE_FAILED, e))?;

    Ok(Json(SuccessResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
