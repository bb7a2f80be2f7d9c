/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List users, each with its tasks
/// - `POST /users` - Create user
/// - `DELETE /users` - Delete user, id in the JSON body
/// - `DELETE /users/:id` - Delete user, id in the path
///
/// Every call and its outcome is logged. Failures are reported to the client
/// as a fixed message per operation; see [`crate::error`].

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::user::{CreateUser, User, UserWithTasks};
use tracing::info;

const FETCH_FAILED: &str = "Failed to fetch users";
const CREATE_FAILED: &str = "Failed to create user";
const DELETE_FAILED: &str = "Failed to delete user";

/// Create user request
///
/// The email is not validated here; the store's uniqueness constraint is the
/// only rule applied.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Email address
    pub email: String,

    /// Optional display name
    pub name: Option<String>,
}

/// Delete user request
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    /// ID of the user to delete
    pub id: i32,
}

/// List all users
///
/// # Endpoint
///
/// ```text
/// GET /users
/// ```
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 1,
///     "email": "ada@example.com",
///     "name": "Ada",
///     "createdAt": "2025-01-03T12:00:00Z",
///     "updatedAt": "2025-01-03T12:00:00Z",
///     "tasks": [ { "id": 4, "title": "Buy milk", "completed": false, "userId": 1, ... } ]
///   }
/// ]
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserWithTasks>>> {
    info!("GET /users called");

    let users = state
        .store
        .list_users()
        .await
        .map_err(|e| ApiError::operation(FETCH_FAILED, e))?;

    info!(count = users.len(), "Fetched users");
    Ok(Json(users))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "name": "Ada" }
/// ```
///
/// # Errors
///
/// - `500 Internal Server Error`: duplicate email, unreadable body, store failure
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    info!("POST /users called");

    let Json(req) = payload.map_err(|e| ApiError::invalid_request(CREATE_FAILED, e.body_text()))?;
    info!(email = %req.email, name = ?req.name, "Creating user");

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            name: req.name,
        })
        .await
        .map_err(|e| ApiError::operation(CREATE_FAILED, e))?;

    info!(user_id = user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Delete a user identified in the request body
///
/// # Endpoint
///
/// ```text
/// DELETE /users
/// Content-Type: application/json
///
/// { "id": 1 }
/// ```
///
/// # Response
///
/// `204 No Content`
///
/// # Errors
///
/// - `500 Internal Server Error`: unknown id, user still owns tasks,
///   unreadable body, store failure
pub async fn delete_user(
    State(state): State<AppState>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    info!("DELETE /users called");

    let Json(req) = payload.map_err(|e| ApiError::invalid_request(DELETE_FAILED, e.body_text()))?;
    remove_user(&state, req.id).await
}

/// Delete a user identified in the path
///
/// Same contract as [`delete_user`].
///
/// ```text
/// DELETE /users/:id
/// ```
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    info!("DELETE /users/:id called");

    let Path(id) = id.map_err(|e| ApiError::invalid_request(DELETE_FAILED, e.body_text()))?;
    remove_user(&state, id).await
}

async fn remove_user(state: &AppState, id: i32) -> ApiResult<StatusCode> {
    info!(user_id = id, "Deleting user");

    state
        .store
        .delete_user(id)
        .await
        .map_err(|e| ApiError::operation(DELETE_FAILED, e))?;

    info!(user_id = id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
